//! Snapshot listing entries and the closest-match scan over them.

use chrono::NaiveDateTime;

/// One row of the snapshot archive: when the full-disk image was taken and
/// the relative link it can be downloaded from. Rows arrive ordered by
/// decreasing recency (most recent first) and are read-only to the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub time: NaiveDateTime,
    pub link: String,
}

impl Snapshot {
    pub fn new(time: NaiveDateTime, link: impl Into<String>) -> Self {
        Self {
            time,
            link: link.into(),
        }
    }
}

fn distance(a: NaiveDateTime, b: NaiveDateTime) -> chrono::Duration {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// Greedy nearest-neighbour scan over a recency-ordered snapshot list.
///
/// An exact-minute match wins immediately. Otherwise the scan tracks the
/// closest candidate so far and stops at the first sign of divergence: a
/// candidate whose distance equals the best seen means the distance has
/// stopped improving (the more recent of two equidistant snapshots is kept),
/// and a strictly growing distance means the scan has walked past the local
/// minimum. The scan is correct because the list is time-ordered, so distance
/// from the target changes near-monotonically along it.
///
/// Returns `None` only for an empty list; the archive collaborator guarantees
/// at least one row.
pub fn closest_snapshot(snapshots: &[Snapshot], target: NaiveDateTime) -> Option<&Snapshot> {
    if let Some(exact) = snapshots.iter().find(|s| s.time == target) {
        return Some(exact);
    }

    let mut iter = snapshots.iter();
    let mut closest = iter.next()?;
    let mut closest_diff = distance(closest.time, target);

    for candidate in iter {
        let diff = distance(candidate.time, target);
        if diff == closest_diff {
            // distance stopped improving; keep the more recent entry
            return Some(closest);
        } else if diff < closest_diff {
            closest = candidate;
            closest_diff = diff;
        } else {
            return Some(closest);
        }
    }

    Some(closest)
}
