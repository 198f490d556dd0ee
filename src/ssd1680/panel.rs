//! Frame buffer backed panel for the QR renderer
//!
//! Drawing only touches the in-memory `Display2in9` buffer, the SPI traffic
//! happens in [`EinkPanel::refresh`].

use core::convert::Infallible;

use embedded_graphics::prelude::*;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use epd_waveshare::color::Color;
use epd_waveshare::epd2in9_v2::Display2in9;
use epd_waveshare::graphics::DisplayRotation;

use crate::qrcode::{EinkPanel, Refresh};
use crate::ssd1680::driver::{DisplayError, Ssd1680};

/// SSD1680 driver together with a full frame buffer
pub struct EpaperPanel<SPI, BSY, DC, RST, DELAY> {
    driver: Ssd1680<SPI, BSY, DC, RST, DELAY>,
    frame: Display2in9,
    invert: bool,
}

impl<SPI, BSY, DC, RST, DELAY> EpaperPanel<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    RST: OutputPin,
    DC: OutputPin,
    BSY: InputPin,
    DELAY: DelayNs,
{
    /// Landscape panel (296x128) with a white frame
    pub fn new(driver: Ssd1680<SPI, BSY, DC, RST, DELAY>) -> Self {
        Self::with_rotation(driver, DisplayRotation::Rotate270, false)
    }

    /// `invert` flips every byte on the way out, for panels with inverted polarity
    pub fn with_rotation(
        driver: Ssd1680<SPI, BSY, DC, RST, DELAY>,
        rotation: DisplayRotation,
        invert: bool,
    ) -> Self {
        let mut frame = Display2in9::default();
        frame.set_rotation(rotation);
        // Infallible, the buffer is in memory
        let _ = frame.clear(Color::White);

        Self {
            driver,
            frame,
            invert,
        }
    }

    pub fn buffer(&self) -> &[u8] {
        self.frame.buffer()
    }

    /// Put the controller into deep sleep, the image stays on the panel
    pub fn sleep(&mut self) -> Result<(), DisplayError> {
        self.driver.sleep()
    }
}

impl<SPI, BSY, DC, RST, DELAY> OriginDimensions for EpaperPanel<SPI, BSY, DC, RST, DELAY> {
    fn size(&self) -> Size {
        self.frame.size()
    }
}

impl<SPI, BSY, DC, RST, DELAY> DrawTarget for EpaperPanel<SPI, BSY, DC, RST, DELAY> {
    type Color = Color;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.frame.draw_iter(pixels).map_err(unreachable)
    }

    fn fill_solid(
        &mut self,
        area: &embedded_graphics::primitives::Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.frame.fill_solid(area, color).map_err(unreachable)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.frame.clear(color).map_err(unreachable)
    }
}

impl<SPI, BSY, DC, RST, DELAY> EinkPanel for EpaperPanel<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    RST: OutputPin,
    DC: OutputPin,
    BSY: InputPin,
    DELAY: DelayNs,
{
    const FOREGROUND: Color = Color::Black;
    const BACKGROUND: Color = Color::White;

    fn set_full_window(&mut self) -> Result<(), Self::Error> {
        self.driver.use_full_frame()
    }

    fn refresh(&mut self, mode: Refresh) -> Result<(), Self::Error> {
        log::info!("Refreshing panel ({:?})", mode);
        self.driver
            .display_frame(self.frame.buffer(), mode, self.invert)
    }
}

fn unreachable(never: Infallible) -> DisplayError {
    match never {}
}
