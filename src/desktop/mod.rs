//! Thin desktop integration: setting the wallpaper and probing the battery.

pub mod battery;
pub mod wallpaper;

pub use wallpaper::{desktop_environment, set_background};
