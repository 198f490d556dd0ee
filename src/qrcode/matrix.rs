//! Encoded QR symbol as a [`ModuleSource`]

use anyhow::{anyhow, Result};
pub use qrcode_generator::QrCodeEcc;

use crate::qrcode::{Module, ModuleSource};

/// Square grid of modules, `rows[row][col]`, true is dark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    rows: Vec<Vec<bool>>,
}

impl QrMatrix {
    /// Encode text with low error correction, giving the largest modules
    pub fn encode(text: &str) -> Result<Self> {
        Self::encode_with(text, QrCodeEcc::Low)
    }

    pub fn encode_with(text: &str, ecc: QrCodeEcc) -> Result<Self> {
        let rows = qrcode_generator::to_matrix(text, ecc)
            .map_err(|e| anyhow!("Failed to encode {} bytes as QR code: {:?}", text.len(), e))?;
        log::debug!("Encoded {} bytes into a {} module QR code", text.len(), rows.len());
        Ok(Self { rows })
    }

    /// Wrap an existing grid, every row must be as long as there are rows
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self> {
        let width = rows.len();
        if let Some(row) = rows.iter().position(|r| r.len() != width) {
            return Err(anyhow!(
                "Row {} has {} modules, expected {}",
                row,
                rows[row].len(),
                width
            ));
        }
        Ok(Self { rows })
    }

    pub fn is_dark(&self, col: u32, row: u32) -> bool {
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
            .unwrap_or(false)
    }
}

impl ModuleSource for QrMatrix {
    fn width(&self) -> u32 {
        self.rows.len() as u32
    }

    fn modules(&self) -> impl Iterator<Item = Module> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().map(move |(col, &dark)| Module {
                col: col as u32,
                row: row as u32,
                dark,
            })
        })
    }
}
