//! QR code rendering for e-ink panels
//!
//! A [`ModuleSource`] produces the square modules of a symbol, [`QrCodeEink`]
//! scales and centers them on anything implementing [`EinkPanel`].
//!
//! ### Usage
//!
//! 1. encode the text into a [`QrMatrix`]
//! 1. create a [`QrCodeEink`] over the panel and call [`QrCodeEink::init`]
//! 1. [`QrCodeEink::render`] the matrix, then refresh the panel
//!
//! ```rust,no_run
//! # fn demo<P: eink_qrcode::qrcode::EinkPanel>(panel: &mut P) -> Result<(), P::Error> {
//! use eink_qrcode::qrcode::{ModuleSource, QrCodeEink, QrMatrix, Refresh};
//!
//! let matrix = QrMatrix::encode("https://www.yr.no").expect("text fits a QR code");
//! let mut qr = QrCodeEink::new(&mut *panel, matrix.width());
//! qr.init();
//! qr.render(&matrix)?;
//! panel.refresh(Refresh::Full)?;
//! # Ok(())
//! # }
//! ```

use embedded_graphics::prelude::{DrawTarget, OriginDimensions};

pub mod eink;
pub mod layout;
pub mod matrix;

pub use eink::QrCodeEink;
pub use layout::{Layout, LayoutError};
pub use matrix::QrMatrix;

/// How the panel redraws after the frame buffer changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Redraws the entire surface, slow but without ghosting
    Full,
    /// Quicker update, may leave ghosting behind
    Partial,
}

/// Display surface the QR renderer paints on
///
/// Drawing goes through the [`DrawTarget`] primitives (`clear`, `fill_solid`),
/// the panel specific parts are the refresh window and the two colors.
pub trait EinkPanel: DrawTarget + OriginDimensions {
    /// Color of a dark module
    const FOREGROUND: Self::Color;
    /// Color of a light module and of a blank screen
    const BACKGROUND: Self::Color;

    /// Select the whole panel as the refresh window
    fn set_full_window(&mut self) -> Result<(), Self::Error>;

    /// Push the frame to the panel, blocks until the refresh has finished
    fn refresh(&mut self, mode: Refresh) -> Result<(), Self::Error>;
}

/// One cell of the symbol grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Module {
    pub col: u32,
    pub row: u32,
    /// true for foreground ("black"), false for background
    pub dark: bool,
}

/// Producer of square modules, such as an encoded QR symbol
pub trait ModuleSource {
    /// Number of modules along one axis
    fn width(&self) -> u32;

    /// Every module, with `col` and `row` in `0..width()`
    fn modules(&self) -> impl Iterator<Item = Module> + '_;
}
