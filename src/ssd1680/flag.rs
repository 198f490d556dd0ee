/// Flag values and constants sent along with the SSD1680 commands
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // Driver Output Control (0x01), gates 0..295 -> MUX = 0x0127
    pub const DRIVER_OUTPUT_MUX_LSB: u8 = 0x27;
    pub const DRIVER_OUTPUT_MUX_MSB: u8 = 0x01;
    pub const DRIVER_OUTPUT_SOURCE_NORMAL_COLOR: u8 = 0x00;

    // Data Entry Mode (0x11) flags
    pub const DATA_ENTRY_INCRY_INCRX: u8 = 0x03; // Y increment, X increment

    // Deep Sleep Mode (0x10) flags
    pub const DEEP_SLEEP_MODE_1: u8 = 0x01; // Enter deep sleep mode

    // Temperature Sensor Control (0x18) flags
    pub const INTERNAL_TEMP_SENSOR: u8 = 0x80;

    // Display Update Control 2 (0x22) sequences
    pub const DISPLAY_UPDATE_FULL: u8 = 0xF4; // Full update
    pub const DISPLAY_UPDATE_PARTIAL: u8 = 0xC7; // Quicker update, may ghost

    // Border Waveform Control (0x3C) flags
    pub const BORDER_WAVEFORM_BLACK: u8 = 0x00; // Black border
    pub const BORDER_WAVEFORM_WHITE: u8 = 0x01; // White border

    // Red RAM is cleared after every update so it never tints the next frame
    pub const RED_RAM_CLEAR: u8 = 0xFF;
}
