//! SSD1680 ePaper Display Driver
//!
//! Used with the 2.9" 128x296 black/white panel.
//!
//! This driver is losely modeled after the
//! [epd-waveshare](https://github.com/caemor/epd-waveshare) drivers but built for my needs.
//!
//! ### Usage
//! Drawing happens in memory, the panel is only touched on refresh. To
//! display something you:
//!
//! 1. create the driver with [`driver::Ssd1680::new`] and wrap it in a [`panel::EpaperPanel`]
//! 1. draw onto the panel, preferably
//! with [`embedded_graphics`](https://github.com/jamwaffles/embedded-graphics) or the
//! [`crate::qrcode::QrCodeEink`] adapter
//! 1. then kick off a display update using [`crate::qrcode::EinkPanel::refresh`]
//!

pub mod driver;
pub mod interface;
pub mod panel;
pub mod pins;

mod cmd;
mod flag;

/// Display height, pixels vertically
pub const HEIGHT: u16 = 296;

/// Display width, pixels horizontally
pub const WIDTH: u16 = 128;

pub use driver::{DisplayError, Ssd1680};
pub use panel::EpaperPanel;
pub use pins::Pins;
