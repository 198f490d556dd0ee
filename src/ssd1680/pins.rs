//! Pin definitions for the SSD1680 e-paper display and associated peripherals
//!
//! This module contains all GPIO pin assignments used in the hardware configuration.
//! `main.rs` takes the matching `peripherals.pins.gpioN` fields.

/// Pin configuration constants for the SSD1680 display and peripherals
pub struct Pins;

impl Pins {
    // SPI Display pins
    /// Chip Select pin for SPI display
    pub const CS: u8 = 45;
    /// Data/Command control pin (High for data, Low for command)
    pub const DC: u8 = 46;
    /// Reset pin for display
    pub const RST: u8 = 47;
    /// Busy status pin (High when display is busy)
    pub const BSY: u8 = 48;
    /// SPI Clock pin
    pub const SCK: u8 = 12;
    /// SPI Master Out Slave In
    pub const MOSI: u8 = 11;
    /// Display power enable, must be high before talking to the panel
    pub const PWR: u8 = 7;

    // Other pins
    /// Battery voltage behind a 2:1 divider, ADC1 channel
    pub const BATTERY_SENSE: u8 = 8;
}

/// Ratio of the resistor divider in front of [`Pins::BATTERY_SENSE`]
pub const BATTERY_DIVIDER: f32 = 2.0;
