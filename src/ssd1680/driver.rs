//! SSD1680 Display Driver Implementation
//!
//! High level functions for display initialization, RAM writes and updates.
//!
//! ### Initialization
//! - `new()` - Create and initialize the driver
//! - `from_interface()` - Wrap an interface without touching the panel
//! - `init()` - Reset and configure the controller
//!
//! ### Frame functions
//! - `use_full_frame()` - RAM window covering the whole panel
//! - `write_frame()` - Send a frame buffer to the B/W RAM
//! - `update()` - Trigger a full or partial refresh
//! - `display_frame()` - All of the above in the order the panel expects
//!
//! ### Power Management
//! - `sleep()` - Enter deep sleep mode
//!
//! ## Critical Implementation Details
//!
//! ### Display Update Value (0xF4 vs 0xC7)
//!
//! The SSD1680 datasheet suggests `0xC7` for Display Update Control 2, but this
//! hardware requires `0xF4` for a clean full refresh. `0xC7` is only used for
//! partial refreshes.
//!
//! ### Polarity Inversion
//!
//! Some panels of this type have inverted polarity (`0x00` = white), so
//! `write_frame()` can invert the buffer on the fly.
//!
//! ### BUSY Pin Wait
//!
//! After `MASTER_ACTIVATE` the BUSY pin has to go LOW before the next
//! command. This takes 1-3 seconds for a full refresh.

pub use display_interface::DisplayError;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::qrcode::Refresh;
use crate::ssd1680::interface::DisplayInterface;
use crate::ssd1680::{cmd::Cmd, flag::Flag, HEIGHT, WIDTH};

/// Bytes per SPI write when sending a frame
const FRAME_CHUNK_SIZE: usize = 128;

/// Size of one RAM plane in bytes
pub const BUFFER_SIZE: usize = (WIDTH as usize / 8) * HEIGHT as usize;

/// SSD1680 E-Paper Display Driver
///
/// ## Type Parameters
///
/// - `SPI` - SPI device for communication
/// - `BSY` - BUSY input pin (HIGH when display is busy)
/// - `DC` - Data/Command output pin
/// - `RST` - Reset output pin
/// - `DELAY` - Delay provider for timing
pub struct Ssd1680<SPI, BSY, DC, RST, DELAY> {
    /// The display interface
    pub interface: DisplayInterface<SPI, BSY, DC, RST, DELAY>,
}

impl<SPI, BSY, DC, RST, DELAY> Ssd1680<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    RST: OutputPin,
    DC: OutputPin,
    BSY: InputPin,
    DELAY: DelayNs,
{
    /// Create and initialize the display driver
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY) -> Result<Self, DisplayError> {
        let interface = DisplayInterface::new(spi, busy, dc, rst, delay);
        let mut ssd1680 = Ssd1680 { interface };
        ssd1680.init()?;
        Ok(ssd1680)
    }

    /// Create a new instance from an existing interface without initialization
    pub fn from_interface(interface: DisplayInterface<SPI, BSY, DC, RST, DELAY>) -> Self {
        Ssd1680 { interface }
    }

    /// Reset and configure the controller
    ///
    /// 1. **Hardware Reset** - Reset pin LOW -> HIGH
    /// 2. **Software Reset** (0x12) - Reset controller state
    /// 3. **Driver Output Control** (0x01) - Configure 296 gate lines
    /// 4. **Data Entry Mode** (0x11) - Set Y+, X+ increment mode
    /// 5. **RAM window and counters** - Whole panel, origin (0, 0)
    /// 6. **Border Waveform** (0x3C) - White border
    /// 7. **Temperature Sensor** (0x18) - Use internal sensor
    ///
    /// No refresh is triggered, the panel keeps its previous image.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        log::info!("Initializing SSD1680 display");

        self.interface.reset()?;

        self.interface.cmd(Cmd::SW_RESET)?;
        self.interface.wait_busy_low();

        self.interface.cmd_with_data(
            Cmd::DRIVER_CONTROL,
            &[
                Flag::DRIVER_OUTPUT_MUX_LSB,
                Flag::DRIVER_OUTPUT_MUX_MSB,
                Flag::DRIVER_OUTPUT_SOURCE_NORMAL_COLOR,
            ],
        )?;
        self.interface
            .cmd_with_data(Cmd::DATA_ENTRY_MODE, &[Flag::DATA_ENTRY_INCRY_INCRX])?;

        self.use_full_frame()?;

        self.set_border_waveform(true)?;
        self.interface
            .cmd_with_data(Cmd::TEMP_CONTROL, &[Flag::INTERNAL_TEMP_SENSOR])?;

        self.interface.wait_busy_low();
        log::info!("SSD1680 initialization complete");
        Ok(())
    }

    /// Select the whole RAM as window and start writing at the origin
    pub fn use_full_frame(&mut self) -> Result<(), DisplayError> {
        self.set_ram_area(0, 0, u32::from(WIDTH) - 1, u32::from(HEIGHT) - 1)?;
        self.set_ram_counter(0, 0)
    }

    /// Write a frame to the black/white RAM, optionally inverting every byte
    ///
    /// - Each byte represents 8 horizontal pixels, MSB first
    /// - Total size: (128 / 8) x 296 = 4736 bytes
    pub fn write_frame(&mut self, buffer: &[u8], invert: bool) -> Result<(), DisplayError> {
        if buffer.len() != BUFFER_SIZE {
            log::warn!(
                "Frame buffer is {} bytes, panel RAM holds {}",
                buffer.len(),
                BUFFER_SIZE
            );
        }

        self.use_full_frame()?;
        self.interface.cmd(Cmd::WRITE_BW_DATA)?;

        let mut scratch = [0u8; FRAME_CHUNK_SIZE];
        for chunk in buffer.chunks(FRAME_CHUNK_SIZE) {
            if invert {
                let inverted = &mut scratch[..chunk.len()];
                for (out, byte) in inverted.iter_mut().zip(chunk) {
                    *out = !byte;
                }
                self.interface.data(inverted)?;
            } else {
                self.interface.data(chunk)?;
            }
        }
        Ok(())
    }

    /// Trigger a refresh from RAM and wait until the panel is idle again
    pub fn update(&mut self, mode: Refresh) -> Result<(), DisplayError> {
        let sequence = match mode {
            Refresh::Full => Flag::DISPLAY_UPDATE_FULL,
            Refresh::Partial => Flag::DISPLAY_UPDATE_PARTIAL,
        };
        log::debug!("Display update {:?} (0x{:02X})", mode, sequence);

        self.interface
            .cmd_with_data(Cmd::UPDATE_DISPLAY_CTRL2, &[sequence])?;
        self.interface.cmd(Cmd::MASTER_ACTIVATE)?;
        self.interface.wait_busy_low();
        Ok(())
    }

    /// Fill the red RAM with white so it does not bleed into the next frame
    pub fn clear_red_ram(&mut self) -> Result<(), DisplayError> {
        self.set_ram_counter(0, 0)?;
        self.interface.cmd(Cmd::WRITE_RED_DATA)?;
        self.interface
            .data_x_times(Flag::RED_RAM_CLEAR, BUFFER_SIZE as u32)?;
        self.interface.wait_busy_low();
        Ok(())
    }

    /// Write buffer to display RAM, refresh, then clear the red RAM
    ///
    /// This is the main function for displaying a drawn frame.
    pub fn display_frame(
        &mut self,
        buffer: &[u8],
        mode: Refresh,
        invert: bool,
    ) -> Result<(), DisplayError> {
        self.write_frame(buffer, invert)?;
        self.update(mode)?;
        self.clear_red_ram()
    }

    /// Put device into deep sleep mode to save power
    ///
    /// Only a hardware reset ([`Ssd1680::init`]) brings it back.
    pub fn sleep(&mut self) -> Result<(), DisplayError> {
        log::info!("Putting display into deep sleep mode");
        self.interface
            .cmd_with_data(Cmd::DEEP_SLEEP_MODE, &[Flag::DEEP_SLEEP_MODE_1])
    }

    /// Set border waveform to white or black
    fn set_border_waveform(&mut self, white: bool) -> Result<(), DisplayError> {
        let value = if white {
            Flag::BORDER_WAVEFORM_WHITE
        } else {
            Flag::BORDER_WAVEFORM_BLACK
        };
        self.interface
            .cmd_with_data(Cmd::BORDER_WAVEFORM_CONTROL, &[value])
    }

    fn set_ram_area(
        &mut self,
        start_x: u32,
        start_y: u32,
        end_x: u32,
        end_y: u32,
    ) -> Result<(), DisplayError> {
        debug_assert!(start_x < end_x);
        debug_assert!(start_y < end_y);

        // X is addressed in bytes
        self.interface.cmd_with_data(
            Cmd::SET_RAMX_START_END,
            &[(start_x >> 3) as u8, (end_x >> 3) as u8],
        )?;

        // Y is 9 bits, little endian
        self.interface.cmd_with_data(
            Cmd::SET_RAMY_START_END,
            &[
                start_y as u8,
                (start_y >> 8) as u8,
                end_y as u8,
                (end_y >> 8) as u8,
            ],
        )
    }

    fn set_ram_counter(&mut self, x: u32, y: u32) -> Result<(), DisplayError> {
        // x is positioned in bytes, so the last 3 bits which show the position inside a byte in the ram
        // aren't relevant
        self.interface
            .cmd_with_data(Cmd::SET_RAMX_COUNTER, &[(x >> 3) as u8])?;

        // 2 Databytes: A[7:0] & 0..A[8]
        self.interface
            .cmd_with_data(Cmd::SET_RAMY_COUNTER, &[y as u8, (y >> 8) as u8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    /// SPI and DC expectations for one command followed by its data
    struct Expect {
        spi: Vec<SpiTransaction<u8>>,
        dc: Vec<PinTransaction>,
    }

    impl Expect {
        fn new() -> Self {
            Self {
                spi: Vec::new(),
                dc: Vec::new(),
            }
        }

        fn write(&mut self, level: PinState, bytes: &[u8]) -> &mut Self {
            self.dc.push(PinTransaction::set(level));
            self.spi.push(SpiTransaction::transaction_start());
            self.spi.push(SpiTransaction::write_vec(bytes.to_vec()));
            self.spi.push(SpiTransaction::transaction_end());
            self
        }

        fn cmd(&mut self, command: u8, data: &[u8]) -> &mut Self {
            self.write(PinState::Low, &[command]);
            if !data.is_empty() {
                self.write(PinState::High, data);
            }
            self
        }

        fn full_frame(&mut self) -> &mut Self {
            self.cmd(Cmd::SET_RAMX_START_END, &[0x00, 0x0F])
                .cmd(Cmd::SET_RAMY_START_END, &[0x00, 0x00, 0x27, 0x01])
                .cmd(Cmd::SET_RAMX_COUNTER, &[0x00])
                .cmd(Cmd::SET_RAMY_COUNTER, &[0x00, 0x00])
        }
    }

    type MockDriver = Ssd1680<SpiMock<u8>, PinMock, PinMock, PinMock, NoopDelay>;

    fn check(expect: &Expect, busy: &[PinTransaction], run: impl FnOnce(&mut MockDriver)) {
        let mut spi = SpiMock::new(&expect.spi);
        let mut dc = PinMock::new(&expect.dc);
        let mut busy = PinMock::new(busy);
        let mut rst = PinMock::new(&[]);

        let mut driver = Ssd1680::from_interface(DisplayInterface::new(
            spi.clone(),
            busy.clone(),
            dc.clone(),
            rst.clone(),
            NoopDelay::new(),
        ));
        run(&mut driver);

        spi.done();
        dc.done();
        busy.done();
        rst.done();
    }

    #[test]
    fn full_frame_window_covers_panel() {
        let mut expect = Expect::new();
        expect.full_frame();

        check(&expect, &[], |driver| driver.use_full_frame().unwrap());
    }

    #[test]
    fn inverted_frame_is_flipped_before_sending() {
        let mut expect = Expect::new();
        expect
            .full_frame()
            .cmd(Cmd::WRITE_BW_DATA, &[])
            .write(PinState::High, &[0xFF, 0x0F]);

        check(&expect, &[], |driver| {
            driver.write_frame(&[0x00, 0xF0], true).unwrap()
        });
    }

    #[test]
    fn frame_is_sent_in_chunks() {
        let frame = [0x55u8; FRAME_CHUNK_SIZE + 3];
        let mut expect = Expect::new();
        expect
            .full_frame()
            .cmd(Cmd::WRITE_BW_DATA, &[])
            .write(PinState::High, &frame[..FRAME_CHUNK_SIZE])
            .write(PinState::High, &frame[FRAME_CHUNK_SIZE..]);

        check(&expect, &[], |driver| driver.write_frame(&frame, false).unwrap());
    }

    #[test]
    fn full_update_waits_for_busy() {
        let mut expect = Expect::new();
        expect
            .cmd(Cmd::UPDATE_DISPLAY_CTRL2, &[Flag::DISPLAY_UPDATE_FULL])
            .cmd(Cmd::MASTER_ACTIVATE, &[]);

        check(
            &expect,
            &[
                PinTransaction::get(PinState::High),
                PinTransaction::get(PinState::Low),
            ],
            |driver| driver.update(Refresh::Full).unwrap(),
        );
    }

    #[test]
    fn partial_update_uses_quick_sequence() {
        let mut expect = Expect::new();
        expect
            .cmd(Cmd::UPDATE_DISPLAY_CTRL2, &[0xC7])
            .cmd(Cmd::MASTER_ACTIVATE, &[]);

        check(
            &expect,
            &[PinTransaction::get(PinState::Low)],
            |driver| driver.update(Refresh::Partial).unwrap(),
        );
    }

    #[test]
    fn sleep_sends_deep_sleep_mode_one() {
        let mut expect = Expect::new();
        expect.cmd(Cmd::DEEP_SLEEP_MODE, &[0x01]);

        check(&expect, &[], |driver| driver.sleep().unwrap());
    }
}
