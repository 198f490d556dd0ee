//! QR code adapter for e-ink panels
//!
//! Maps module coordinates onto physical pixels: every module becomes a
//! filled square of `multiply` pixels, and the grid is centered on the panel.

use embedded_graphics::prelude::{OriginDimensions, Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::qrcode::layout::Layout;
use crate::qrcode::{EinkPanel, ModuleSource, Refresh};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Uninitialized,
    Ready(Layout),
}

/// Draws a square module grid onto a borrowed [`EinkPanel`]
///
/// The panel is not owned; it stays usable by the caller once the adapter
/// is dropped. Call [`QrCodeEink::init`] before drawing. Drawing earlier
/// uses a zero layout, producing nothing visible.
pub struct QrCodeEink<'d, P> {
    display: &'d mut P,
    grid_width: u32,
    state: State,
}

impl<'d, P> QrCodeEink<'d, P>
where
    P: EinkPanel,
{
    /// Create the adapter for a grid of `grid_width` x `grid_width` modules
    pub fn new(display: &'d mut P, grid_width: u32) -> Self {
        Self {
            display,
            grid_width,
            state: State::Uninitialized,
        }
    }

    /// Compute scale and centering from the current panel size
    pub fn init(&mut self) {
        self.init_with_offset(0, 0);
    }

    /// Compute scale and centering, then shift the grid by the given pixels
    pub fn init_with_offset(&mut self, x_offset: i32, y_offset: i32) {
        let screen = self.display.size();
        let layout = Layout::compute(screen, self.grid_width, Point::new(x_offset, y_offset));

        if layout.is_degenerate() {
            log::warn!(
                "QR grid of {} modules does not fit {}x{} display, nothing will be visible",
                self.grid_width,
                screen.width,
                screen.height
            );
        }
        log::debug!(
            "QR layout: {} px per module, offset ({}, {})",
            layout.multiply,
            layout.offset_x,
            layout.offset_y
        );

        self.state = State::Ready(layout);
    }

    /// Blank the whole panel with a full refresh
    ///
    /// On e-paper this takes a few seconds.
    pub fn clear_to_white(&mut self) -> Result<(), P::Error> {
        self.display.set_full_window()?;
        self.display.clear(P::BACKGROUND)?;
        self.display.refresh(Refresh::Full)
    }

    /// End of frame hook, the panel refreshes on its own
    pub fn notify_frame_complete(&mut self) {}

    /// Fill the square of module (`col`, `row`)
    ///
    /// Coordinates are not checked against the grid width. The part of the
    /// square outside the panel is dropped, an off-panel module fills an
    /// empty rectangle.
    pub fn draw_module(&mut self, col: u32, row: u32, dark: bool) -> Result<(), P::Error> {
        let layout = self.layout();
        let color = if dark { P::FOREGROUND } else { P::BACKGROUND };
        let area = visible_area(
            layout.module_origin(col, row),
            layout.module_size(),
            self.display.size(),
        );

        self.display.fill_solid(&area, color)
    }

    /// Blank the panel and paint every module of `source`
    ///
    /// The drawn frame is left in the panel, push it with
    /// [`EinkPanel::refresh`].
    pub fn render<S>(&mut self, source: &S) -> Result<(), P::Error>
    where
        S: ModuleSource,
    {
        if source.width() != self.grid_width {
            log::warn!(
                "Rendering a {} module source with a layout for {} modules",
                source.width(),
                self.grid_width
            );
        }

        self.clear_to_white()?;
        for module in source.modules() {
            self.draw_module(module.col, module.row, module.dark)?;
        }
        self.notify_frame_complete();
        Ok(())
    }

    /// Current geometry, all zero before [`QrCodeEink::init`]
    pub fn layout(&self) -> Layout {
        match self.state {
            State::Ready(layout) => layout,
            State::Uninitialized => {
                log::debug!("QR adapter used before init");
                Layout::default()
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    pub fn grid_width(&self) -> u32 {
        self.grid_width
    }
}

/// Intersection of a square with the panel, computed wide so no edge overflows
fn visible_area(origin: Point, size: Size, screen: Size) -> Rectangle {
    let left = i64::from(origin.x).max(0);
    let top = i64::from(origin.y).max(0);
    let right = (i64::from(origin.x) + i64::from(size.width)).min(i64::from(screen.width));
    let bottom = (i64::from(origin.y) + i64::from(size.height)).min(i64::from(screen.height));

    if right <= left || bottom <= top {
        return Rectangle::zero();
    }
    Rectangle::new(
        Point::new(left as i32, top as i32),
        Size::new((right - left) as u32, (bottom - top) as u32),
    )
}
