//! Battery gauge and the small indicator drawn in the corner of the screen

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use crate::config::BatteryConfig;

/// Charge below this percentage counts as low
const LOW_PERCENT: u8 = 10;

/// Linear voltage to charge mapping between two thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryGauge {
    pub min_voltage: f32,
    pub max_voltage: f32,
}

impl BatteryGauge {
    pub const fn new(min_voltage: f32, max_voltage: f32) -> Self {
        Self {
            min_voltage,
            max_voltage,
        }
    }

    /// Remaining charge, clamped to 0..=100
    pub fn percent(&self, voltage: f32) -> u8 {
        let span = self.max_voltage - self.min_voltage;
        if span <= 0.0 || voltage.is_nan() {
            return 0;
        }
        let ratio = ((voltage - self.min_voltage) / span).clamp(0.0, 1.0);
        (ratio * 100.0).round() as u8
    }

    pub fn is_low(&self, voltage: f32) -> bool {
        self.percent(voltage) < LOW_PERCENT
    }
}

impl From<&BatteryConfig> for BatteryGauge {
    fn from(config: &BatteryConfig) -> Self {
        Self::new(config.min_voltage, config.max_voltage)
    }
}

/// Battery symbol: outline, terminal nub on the right, fill proportional to charge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryIndicator {
    pub top_left: Point,
    /// Size of the body, the nub is drawn outside of it
    pub size: Size,
    pub percent: u8,
}

impl BatteryIndicator {
    /// Width of the terminal nub in pixels
    pub const NUB_WIDTH: u32 = 2;

    pub fn new(top_left: Point, size: Size, percent: u8) -> Self {
        Self {
            top_left,
            size,
            percent: percent.min(100),
        }
    }

    /// Place a default sized indicator in the top right corner of `area`
    pub fn top_right(area: Size, percent: u8) -> Self {
        let size = Size::new(20, 10);
        let margin = 2;
        let x = area.width.saturating_sub(size.width + Self::NUB_WIDTH + margin) as i32;
        Self::new(Point::new(x, margin as i32), size, percent)
    }

    fn body(&self) -> Rectangle {
        Rectangle::new(self.top_left, self.size)
    }

    fn nub(&self) -> Rectangle {
        let height = (self.size.height / 2).max(1);
        Rectangle::new(
            self.top_left
                + Point::new(
                    self.size.width as i32,
                    (self.size.height.saturating_sub(height) / 2) as i32,
                ),
            Size::new(Self::NUB_WIDTH, height),
        )
    }

    /// Inner fill area, one pixel gap inside the outline
    fn level(&self) -> Rectangle {
        let inner = Size::new(
            self.size.width.saturating_sub(4),
            self.size.height.saturating_sub(4),
        );
        let width = inner.width * u32::from(self.percent) / 100;
        Rectangle::new(self.top_left + Point::new(2, 2), Size::new(width, inner.height))
    }

    /// Draw with `fg` for ink and `bg` for the empty part
    pub fn draw<D>(&self, target: &mut D, fg: D::Color, bg: D::Color) -> Result<(), D::Error>
    where
        D: DrawTarget,
    {
        let body = self.body();
        target.fill_solid(&body, bg)?;
        body.into_styled(PrimitiveStyle::with_stroke(fg, 1))
            .draw(target)?;
        target.fill_solid(&self.nub(), fg)?;
        target.fill_solid(&self.level(), fg)
    }
}
