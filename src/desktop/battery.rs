//! Battery probe backing the `--save-battery` flag.

use crate::Result;

/// Whether the machine is currently running off its battery. Reads the
/// kernel's power-supply class; with several batteries present, BAT0 is the
/// one consulted.
#[cfg(target_os = "linux")]
pub fn is_discharging() -> Result<bool> {
    use crate::Error;
    use log::info;
    use std::fs;

    let mut batteries: Vec<_> = fs::read_dir("/sys/class/power_supply")?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("BAT"))
        })
        .collect();
    batteries.sort();

    if batteries.len() > 1 {
        info!("multiple batteries detected, using BAT0.");
    }

    let first = batteries
        .first()
        .ok_or_else(|| Error::Validation(String::from("no battery found")))?;
    let status = fs::read_to_string(first.join("status"))?;
    Ok(status.trim() == "Discharging")
}

#[cfg(not(target_os = "linux"))]
pub fn is_discharging() -> Result<bool> {
    Err(crate::Error::Validation(String::from(
        "battery saving feature works only on linux",
    )))
}
