use anyhow::anyhow;

use eink_qrcode::qrcode::{ModuleSource, QrCodeEink, QrMatrix, Refresh};
use eink_qrcode::{BatteryGauge, BatteryIndicator, Config, EinkPanel};

/// Time between two wake ups
const REFRESH_INTERVAL_SECS: u64 = 30 * 60;

/// Draw the QR code (and battery indicator) and push the frame to the panel
fn draw_frame<P>(panel: &mut P, config: &Config, battery_voltage: Option<f32>) -> anyhow::Result<()>
where
    P: EinkPanel,
    P::Error: core::fmt::Debug,
{
    let text = config.qr_text();
    log::info!("Encoding QR code for: {}", text);
    let matrix = QrMatrix::encode(&text)?;

    {
        let mut qr = QrCodeEink::new(&mut *panel, matrix.width());
        qr.init_with_offset(config.qrcode.x_offset, config.qrcode.y_offset);
        log::info!(
            "QR code: {} modules, {} px each",
            matrix.width(),
            qr.layout().multiply
        );
        qr.render(&matrix)
            .map_err(|e| anyhow!("Failed to render QR code: {:?}", e))?;
    }

    if let (true, Some(voltage)) = (config.battery.show_indicator, battery_voltage) {
        let gauge = BatteryGauge::from(&config.battery);
        let percent = gauge.percent(voltage);
        log::info!("Battery: {:.2} V ({}%)", voltage, percent);
        if gauge.is_low(voltage) {
            log::warn!("Battery is low");
        }

        BatteryIndicator::top_right(panel.size(), percent)
            .draw(panel, P::FOREGROUND, P::BACKGROUND)
            .map_err(|e| anyhow!("Failed to draw battery indicator: {:?}", e))?;
    }

    panel
        .refresh(Refresh::Full)
        .map_err(|e| anyhow!("Failed to refresh display: {:?}", e))
}

// https://docs.esp-rs.org/esp-idf-svc/esp_idf_svc/
#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use eink_qrcode::ssd1680::pins::{Pins, BATTERY_DIVIDER};
    use eink_qrcode::{EpaperPanel, Ssd1680};
    use esp_idf_svc::hal::adc::attenuation::DB_11;
    use esp_idf_svc::hal::adc::oneshot::config::AdcChannelConfig;
    use esp_idf_svc::hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
    use esp_idf_svc::hal::delay::Delay;
    use esp_idf_svc::hal::gpio;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::prelude::*;
    use esp_idf_svc::hal::spi;

    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();

    let config = Config::embedded()?;
    log::set_max_level(config.log_level());
    log::info!(
        "Forecast location '{}', user agent '{}'",
        config.forecast.location_id,
        config.forecast.user_agent
    );
    log::debug!(
        "Graph without precipitation: {}",
        config.forecast.show_graph_on_no_precipitation
    );
    if config.has_wifi() {
        log::debug!("Wi-Fi '{}' configured, the radio stays off", config.wifi.ssid);
    }

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    let battery_voltage = if config.battery.show_indicator {
        let adc = AdcDriver::new(peripherals.adc1)?;
        let channel_config = AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        };
        log::debug!("Reading battery voltage on pin {}", Pins::BATTERY_SENSE);
        let mut channel = AdcChannelDriver::new(&adc, pins.gpio8, &channel_config)?;
        let millivolts = adc.read(&mut channel)?;
        Some(f32::from(millivolts) / 1000.0 * BATTERY_DIVIDER)
    } else {
        None
    };

    log::info!(
        "Configuring SPI for the display (SCK {}, MOSI {}, CS {})",
        Pins::SCK,
        Pins::MOSI,
        Pins::CS
    );
    let mut driver = spi::SpiDeviceDriver::new_single(
        peripherals.spi2,
        pins.gpio12,                                          // SCK - Pins::SCK
        pins.gpio11,                                          // MOSI - Pins::MOSI
        Option::<gpio::AnyIOPin>::None,                       // No MISO needed for display
        Some(pins.gpio45),                                    // CS - Pins::CS
        &spi::SpiDriverConfig::new().dma(spi::Dma::Disabled), // Frames are sent in small chunks
        &spi::SpiConfig::new().baudrate(4.MHz().into()),
    )?;

    log::info!("Enabling display power (pin {})", Pins::PWR);
    let mut power_pin = gpio::PinDriver::output(pins.gpio7)?; // Pins::PWR
    power_pin.set_high()?;

    let delay = Delay::default();
    delay.delay_ms(100); // Wait for power to stabilize

    let ssd1680 = Ssd1680::new(
        &mut driver,
        gpio::PinDriver::input(pins.gpio48)?,  // Pins::BSY
        gpio::PinDriver::output(pins.gpio46)?, // Pins::DC
        gpio::PinDriver::output(pins.gpio47)?, // Pins::RST
        delay,
    )
    .map_err(|e| anyhow!("Could not create EPD driver: {:?}", e))?;
    let mut panel = EpaperPanel::new(ssd1680);

    let result = draw_frame(&mut panel, &config, battery_voltage);
    if let Err(e) = &result {
        log::error!("{:?}", e);
    }

    if let Err(e) = panel.sleep() {
        log::error!("Failed to put display to sleep: {:?}", e);
    }
    power_pin.set_low()?;

    let wakeup_reason = esp_idf_svc::hal::reset::WakeupReason::get();
    log::info!("Wakeup reason: {:?}", wakeup_reason);

    log::info!("Going to deep sleep for {} seconds", REFRESH_INTERVAL_SECS);
    unsafe {
        esp_idf_svc::sys::esp_deep_sleep(REFRESH_INTERVAL_SECS * 1_000_000);
    }
}

/// Host build: render into a PBM image instead of the panel
#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;

    let config = Config::embedded()?;
    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("preview.pbm"));

    let mut panel = preview::PreviewPanel::new(296, 128);
    draw_frame(&mut panel, &config, Some(config.battery.max_voltage))?;

    std::fs::write(&path, panel.to_pbm()).with_context(|| format!("Failed to write {}", path))?;
    log::info!(
        "Preview written to {} (next refresh on the device in {} s)",
        path,
        REFRESH_INTERVAL_SECS
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
mod preview {
    use core::convert::Infallible;

    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::*;

    use eink_qrcode::qrcode::{EinkPanel, Refresh};

    /// In-memory panel, BinaryColor::On is black
    pub struct PreviewPanel {
        size: Size,
        pixels: Vec<bool>,
        refreshes: usize,
    }

    impl PreviewPanel {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                size: Size::new(width, height),
                pixels: vec![false; (width * height) as usize],
                refreshes: 0,
            }
        }

        /// Plain PBM (P1), 1 is black
        pub fn to_pbm(&self) -> String {
            let mut out = format!("P1\n{} {}\n", self.size.width, self.size.height);
            for row in self.pixels.chunks(self.size.width as usize) {
                let line: Vec<&str> = row.iter().map(|&on| if on { "1" } else { "0" }).collect();
                out.push_str(&line.join(" "));
                out.push('\n');
            }
            out
        }
    }

    impl OriginDimensions for PreviewPanel {
        fn size(&self) -> Size {
            self.size
        }
    }

    impl DrawTarget for PreviewPanel {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            let bounds = self.bounding_box();
            for Pixel(point, color) in pixels {
                if bounds.contains(point) {
                    let index = point.y as usize * self.size.width as usize + point.x as usize;
                    self.pixels[index] = color.is_on();
                }
            }
            Ok(())
        }
    }

    impl EinkPanel for PreviewPanel {
        const FOREGROUND: BinaryColor = BinaryColor::On;
        const BACKGROUND: BinaryColor = BinaryColor::Off;

        fn set_full_window(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        fn refresh(&mut self, mode: Refresh) -> Result<(), Self::Error> {
            self.refreshes += 1;
            log::debug!("Preview refresh #{} ({:?})", self.refreshes, mode);
            Ok(())
        }
    }
}
