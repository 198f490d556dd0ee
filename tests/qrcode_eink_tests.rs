use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use eink_qrcode::qrcode::{
    EinkPanel, Layout, LayoutError, ModuleSource, QrCodeEink, QrMatrix, Refresh,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    FullWindow,
    Clear(BinaryColor),
    Fill(Rectangle, BinaryColor),
    Refresh(Refresh),
}

/// Panel that only records what was asked of it
struct RecordingPanel {
    size: Size,
    ops: Vec<Op>,
}

impl RecordingPanel {
    fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            ops: Vec::new(),
        }
    }

    fn fills(&self) -> Vec<(Rectangle, BinaryColor)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Fill(area, color) => Some((*area, *color)),
                _ => None,
            })
            .collect()
    }
}

impl OriginDimensions for RecordingPanel {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for RecordingPanel {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, _pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.ops.push(Op::Fill(*area, color));
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.ops.push(Op::Clear(color));
        Ok(())
    }
}

impl EinkPanel for RecordingPanel {
    const FOREGROUND: BinaryColor = BinaryColor::On;
    const BACKGROUND: BinaryColor = BinaryColor::Off;

    fn set_full_window(&mut self) -> Result<(), Self::Error> {
        self.ops.push(Op::FullWindow);
        Ok(())
    }

    fn refresh(&mut self, mode: Refresh) -> Result<(), Self::Error> {
        self.ops.push(Op::Refresh(mode));
        Ok(())
    }
}

#[test]
fn version_one_symbol_on_small_panel() {
    let mut panel = RecordingPanel::new(250, 122);
    {
        let mut qr = QrCodeEink::new(&mut panel, 21);
        qr.init();

        let layout = qr.layout();
        assert_eq!(layout.multiply, 5);
        assert_eq!((layout.offset_x, layout.offset_y), (72, 8));

        qr.draw_module(0, 0, true).unwrap();
        qr.draw_module(20, 20, false).unwrap();
    }

    assert_eq!(
        panel.fills(),
        vec![
            (
                Rectangle::new(Point::new(72, 8), Size::new(5, 5)),
                BinaryColor::On
            ),
            (
                Rectangle::new(Point::new(172, 108), Size::new(5, 5)),
                BinaryColor::Off
            ),
        ]
    );
}

#[test]
fn grid_is_centered_and_inside_the_panel() {
    for (width, height) in [(250, 122), (296, 128), (128, 296), (200, 200), (64, 48)] {
        for grid in [21, 25, 29, 33, 41] {
            let layout = Layout::compute(Size::new(width, height), grid, Point::zero());
            if grid > width.min(height) {
                assert!(layout.is_degenerate());
                continue;
            }

            assert!(layout.multiply >= 1, "{}x{} grid {}", width, height, grid);
            let extent = (grid * layout.multiply) as i32;
            assert!(extent <= width.min(height) as i32);
            // one more pixel per module would not fit
            assert!(grid * (layout.multiply + 1) > width.min(height));

            assert!(layout.offset_x >= 0 && layout.offset_y >= 0);
            assert!(layout.offset_x + extent <= width as i32);
            assert!(layout.offset_y + extent <= height as i32);

            let left = layout.offset_x;
            let right = width as i32 - extent - layout.offset_x;
            assert!(right - left == 0 || right - left == 1);
        }
    }
}

#[test]
fn repeated_init_gives_the_same_layout() {
    let mut panel = RecordingPanel::new(296, 128);
    let mut qr = QrCodeEink::new(&mut panel, 25);
    assert!(!qr.is_ready());

    qr.init();
    let first = qr.layout();
    qr.init();
    assert_eq!(qr.layout(), first);
    assert!(qr.is_ready());
}

#[test]
fn drawing_before_init_paints_nothing_visible() {
    let mut panel = RecordingPanel::new(250, 122);
    {
        let mut qr = QrCodeEink::new(&mut panel, 21);
        qr.draw_module(3, 4, true).unwrap();
    }

    let fills = panel.fills();
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].0.size, Size::zero());
}

#[test]
fn medium_grid_on_tiny_panel() {
    let mut panel = RecordingPanel::new(128, 64);
    {
        let mut qr = QrCodeEink::new(&mut panel, 30);
        qr.init();
        assert_eq!(qr.layout().multiply, 2);
        assert_eq!((qr.layout().offset_x, qr.layout().offset_y), (34, 2));
        qr.draw_module(29, 29, true).unwrap();
    }

    assert_eq!(
        panel.fills(),
        vec![(
            Rectangle::new(Point::new(92, 60), Size::new(2, 2)),
            BinaryColor::On
        )]
    );
}

#[test]
fn oversized_grid_degenerates_silently() {
    let mut panel = RecordingPanel::new(128, 64);
    {
        let mut qr = QrCodeEink::new(&mut panel, 65);
        qr.init();
        assert_eq!(qr.layout().multiply, 0);
        assert!(qr.layout().is_degenerate());

        for col in 0..65 {
            qr.draw_module(col, 0, true).unwrap();
        }
    }

    assert_eq!(panel.fills().len(), 65);
    assert!(panel.fills().iter().all(|(area, _)| area.size == Size::zero()));

    assert_eq!(
        Layout::checked(Size::new(128, 64), 65, Point::zero()),
        Err(LayoutError::InvalidConfiguration {
            grid_width: 65,
            min_dimension: 64,
        })
    );
}

#[test]
fn nudge_moves_every_module() {
    let mut panel = RecordingPanel::new(250, 122);
    {
        let mut qr = QrCodeEink::new(&mut panel, 21);
        qr.init_with_offset(-10, 3);
        assert_eq!(qr.layout().multiply, 5);
        qr.draw_module(1, 1, true).unwrap();
    }

    assert_eq!(
        panel.fills()[0].0,
        Rectangle::new(Point::new(67, 16), Size::new(5, 5))
    );
}

#[test]
fn out_of_grid_coordinates_and_extreme_nudge_fail_silently() {
    let mut panel = RecordingPanel::new(250, 122);
    {
        let mut qr = QrCodeEink::new(&mut panel, 21);
        qr.init_with_offset(i32::MAX, i32::MIN);
        assert_eq!(qr.layout().multiply, 5);

        qr.draw_module(0, 0, true).unwrap();
        qr.draw_module(500_000_000, 0, true).unwrap();
        qr.draw_module(u32::MAX, u32::MAX, false).unwrap();
    }

    {
        let mut qr = QrCodeEink::new(&mut panel, 21);
        qr.init();
        qr.draw_module(500_000_000, 0, true).unwrap();
        // one column past the grid is still on this panel
        qr.draw_module(21, 0, true).unwrap();
    }

    let fills = panel.fills();
    assert_eq!(fills.len(), 5);
    let bounds = Rectangle::new(Point::zero(), Size::new(250, 122));
    for (area, _) in &fills {
        assert!(area.size == Size::zero() || bounds.contains(area.top_left));
    }
    assert_eq!(
        fills[4].0,
        Rectangle::new(Point::new(177, 8), Size::new(5, 5))
    );
}

#[test]
fn clear_to_white_uses_full_window_and_full_refresh() {
    let mut panel = RecordingPanel::new(296, 128);
    {
        let mut qr = QrCodeEink::new(&mut panel, 21);
        qr.init();
        qr.clear_to_white().unwrap();
        qr.notify_frame_complete();
    }

    assert_eq!(
        panel.ops,
        vec![
            Op::FullWindow,
            Op::Clear(BinaryColor::Off),
            Op::Refresh(Refresh::Full)
        ]
    );
}

#[test]
fn render_paints_every_module_of_an_encoded_symbol() {
    let matrix = QrMatrix::encode("https://www.yr.no").unwrap();
    let width = matrix.width();

    let mut panel = RecordingPanel::new(296, 128);
    let layout = {
        let mut qr = QrCodeEink::new(&mut panel, width);
        qr.init();
        qr.render(&matrix).unwrap();
        qr.layout()
    };

    assert_eq!(&panel.ops[..3], &[
        Op::FullWindow,
        Op::Clear(BinaryColor::Off),
        Op::Refresh(Refresh::Full)
    ]);

    let fills = panel.fills();
    assert_eq!(fills.len() as u32, width * width);

    // finder pattern corners are dark
    for (col, row) in [(0, 0), (width - 1, 0), (0, width - 1)] {
        let origin = layout.module_origin(col, row);
        assert!(fills
            .iter()
            .any(|(area, color)| area.top_left == origin && *color == BinaryColor::On));
    }

    // render leaves the final refresh to the caller
    assert!(!matches!(panel.ops.last(), Some(Op::Refresh(_))));
}
