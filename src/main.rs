//! Readout loop for the helm instrument pod

use std::thread;
use std::time::Duration;

use anyhow::Context;
use rppal::gpio::Gpio;
use tracing::{info, warn, Level};

use instruments::peripheral::bno055::{Bno055, BNO055_ADDRESS};
use instruments::peripheral::bus::I2cDevice;
use instruments::peripheral::max7219::{Max7219, ThreeWire};

const PIN_DATA: u8 = 23;
const PIN_CLOCK: u8 = 24;
const PIN_SELECT: u8 = 25;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();
    info!("Starting instrument pod");

    let bus = I2cDevice::new(BNO055_ADDRESS).context("Open sensor bus")?;
    let mut sensor = Bno055::new(bus);
    sensor.begin().context("Bring up sensor")?;

    let gpio = Gpio::new().context("Create gpio")?;
    let data = gpio.get(PIN_DATA).context("Data pin")?.into_output();
    let clock = gpio.get(PIN_CLOCK).context("Clock pin")?.into_output();
    let select = gpio.get(PIN_SELECT).context("Select pin")?.into_output();

    let bus = ThreeWire::new(data, clock, select).context("Open display bus")?;
    let mut display = Max7219::new(bus).context("Bring up display")?;

    let interval = Duration::from_millis(100);
    let mut lit = None;

    loop {
        match sensor.read_orientation() {
            Ok(angles) => {
                // One lit column per 45 degree heading sector
                let col = (angles.heading.0.rem_euclid(360.0) / 45.0) as u8 % 8;

                if lit != Some(col) {
                    if let Some(old) = lit {
                        for row in 0..8 {
                            display.set_led(row, old, false).context("Blank column")?;
                        }
                    }
                    for row in 0..8 {
                        display.set_led(row, col, true).context("Light column")?;
                    }

                    lit = Some(col);
                    info!("Heading {}", angles.heading);
                }
            }
            Err(error) => {
                warn!("Orientation read failed: {error:?}");
            }
        }

        thread::sleep(interval);
    }
}
