//! E-ink firmware pieces that do not depend on ESP-IDF
//!
//! The library builds on the host too, which is where the tests run.

pub mod battery;
pub mod config;
pub mod qrcode;
pub mod ssd1680;

pub use crate::battery::{BatteryGauge, BatteryIndicator};
pub use crate::config::Config;
pub use crate::qrcode::{EinkPanel, QrCodeEink, QrMatrix, Refresh};
pub use crate::ssd1680::{EpaperPanel, Ssd1680};
