//! Resolution of a user-requested UTC offset into a target timestamp in the
//! satellite's UTC+10:00 reference frame.
//!
//! All timestamp arithmetic in this crate happens on naive wall-clock values
//! interpreted in the satellite frame; converting a request from another zone
//! is a matter of shifting by the signed hour delta between the two zones.

use chrono::{Duration, Local, NaiveDateTime, Offset};
use log::info;

use crate::core::constants::{MAX_UTC_OFFSET, MIN_UTC_OFFSET, SATELLITE_UTC_OFFSET};
use crate::{Error, Result};

/// Rejects offsets outside the supported [-12, +10] domain.
pub fn validate_offset(offset: i32) -> Result<()> {
    if (MIN_UTC_OFFSET..=MAX_UTC_OFFSET).contains(&offset) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "OFFSET has to be between -12 and +10, got {offset:+}"
        )))
    }
}

/// Current local UTC offset in whole hours, truncated toward zero.
pub fn detect_local_offset() -> i32 {
    let seconds = Local::now().offset().fix().local_minus_utc();
    seconds / 3600
}

/// Folds a detected offset east of the satellite back into the supported
/// domain: zones up to one hour past +10 snap to +10, zones beyond that wrap
/// across the date line to -12.
pub fn clamp_detected_offset(raw: i32) -> i32 {
    if raw > 10 && raw <= 11 {
        info!("offset is greater than +10, +10 will be used...");
        10
    } else if raw > 11 && raw <= 12 {
        info!("offset is greater than +10, -12 will be used...");
        -12
    } else {
        raw
    }
}

/// Shifts the latest known snapshot time into the requested observation zone.
///
/// With `auto` set, the local UTC offset is sampled at call time and clamped
/// via [`clamp_detected_offset`]; otherwise `requested` is validated against
/// the [-12, +10] domain. The result keeps every calendar field of the
/// hour-shifted instant.
pub fn resolve_target_time(
    latest: NaiveDateTime,
    auto: bool,
    requested: i32,
) -> Result<NaiveDateTime> {
    let offset = if auto {
        let detected = detect_local_offset();
        info!("detected offset: UTC{detected:+03}:00");
        clamp_detected_offset(detected)
    } else {
        validate_offset(requested)?;
        requested
    };

    let effective = offset - SATELLITE_UTC_OFFSET;
    Ok(latest + Duration::hours(i64::from(effective)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn shifts_by_the_delta_to_the_satellite_zone() {
        // offset +3 against the satellite's +10 walks seven hours back
        let latest = ts(2024, 3, 1, 3, 0);
        let target = resolve_target_time(latest, false, 3).unwrap();
        assert_eq!(target, ts(2024, 2, 28, 20, 0));
    }

    #[test]
    fn satellite_native_offset_is_identity() {
        let latest = ts(2024, 3, 1, 3, 0);
        assert_eq!(resolve_target_time(latest, false, 10).unwrap(), latest);
    }

    #[test]
    fn is_deterministic_for_fixed_inputs() {
        let latest = ts(2024, 6, 15, 12, 30);
        for offset in MIN_UTC_OFFSET..=MAX_UTC_OFFSET {
            let first = resolve_target_time(latest, false, offset).unwrap();
            let second = resolve_target_time(latest, false, offset).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn rejects_out_of_domain_offsets() {
        let latest = ts(2024, 3, 1, 3, 0);
        assert!(resolve_target_time(latest, false, 11).is_err());
        assert!(resolve_target_time(latest, false, -13).is_err());
        assert!(matches!(
            resolve_target_time(latest, false, 11),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn clamps_offsets_east_of_the_satellite() {
        assert_eq!(clamp_detected_offset(11), 10);
        assert_eq!(clamp_detected_offset(12), -12);
        // everything at or below +10 passes through unchanged
        assert_eq!(clamp_detected_offset(10), 10);
        assert_eq!(clamp_detected_offset(0), 0);
        assert_eq!(clamp_detected_offset(-12), -12);
    }

    #[test]
    fn clamped_offsets_stay_in_domain() {
        for raw in -12..=12 {
            let clamped = clamp_detected_offset(raw);
            assert!((MIN_UTC_OFFSET..=MAX_UTC_OFFSET).contains(&clamped));
        }
    }
}
