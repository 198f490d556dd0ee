//! Scale and centering of a square module grid on a physical display

use core::fmt;

use embedded_graphics::prelude::{Point, Size};

/// Pixel geometry of a module grid on a display
///
/// All values are derived from the display size and the grid width, see
/// [`Layout::compute`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Layout {
    /// Pixels per module
    pub multiply: u32,
    /// Left edge of the grid
    pub offset_x: i32,
    /// Top edge of the grid
    pub offset_y: i32,
}

/// Returned by [`Layout::checked`] when the grid cannot be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// The grid has more modules than the smaller display side has pixels
    InvalidConfiguration { grid_width: u32, min_dimension: u32 },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::InvalidConfiguration {
                grid_width,
                min_dimension,
            } => write!(
                f,
                "grid of {} modules does not fit in {} pixels",
                grid_width, min_dimension
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

impl Layout {
    /// Largest integer scale that fits the smaller display side, centered,
    /// then shifted by `nudge`
    ///
    /// Never fails: a grid wider than the display gives `multiply == 0`.
    pub fn compute(screen: Size, grid_width: u32, nudge: Point) -> Self {
        let min = screen.width.min(screen.height);
        // zero width grid behaves like an oversized one
        let multiply = min.checked_div(grid_width).unwrap_or(0);
        let extent = grid_width.saturating_mul(multiply);

        Self {
            multiply,
            offset_x: centered(screen.width, extent).wrapping_add(nudge.x),
            offset_y: centered(screen.height, extent).wrapping_add(nudge.y),
        }
    }

    /// Same as [`Layout::compute`], rejecting layouts without visible output
    pub fn checked(screen: Size, grid_width: u32, nudge: Point) -> Result<Self, LayoutError> {
        let layout = Self::compute(screen, grid_width, nudge);
        if layout.is_degenerate() {
            return Err(LayoutError::InvalidConfiguration {
                grid_width,
                min_dimension: screen.width.min(screen.height),
            });
        }
        Ok(layout)
    }

    /// Every module would be drawn as an empty rectangle
    pub fn is_degenerate(&self) -> bool {
        self.multiply == 0
    }

    /// Top left pixel of a module
    ///
    /// Coordinates far outside the grid wrap around instead of overflowing.
    pub fn module_origin(&self, col: u32, row: u32) -> Point {
        let multiply = self.multiply as i32;
        Point::new(
            self.offset_x.wrapping_add((col as i32).wrapping_mul(multiply)),
            self.offset_y.wrapping_add((row as i32).wrapping_mul(multiply)),
        )
    }

    /// Pixel size of one module
    pub fn module_size(&self) -> Size {
        Size::new_equal(self.multiply)
    }

    /// Pixel size of the whole grid
    pub fn grid_size(&self, grid_width: u32) -> Size {
        Size::new_equal(grid_width.saturating_mul(self.multiply))
    }
}

fn centered(available: u32, extent: u32) -> i32 {
    (available.saturating_sub(extent) / 2) as i32
}
