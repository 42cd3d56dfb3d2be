//! rppal-backed transports for the real hardware

use anyhow::{ensure, Context};
use rppal::gpio::OutputPin;
use rppal::i2c::I2c;
use tracing::trace;

use crate::peripheral::{Device, Line};

/// One chip at a fixed 7-bit address on the shared i2c bus
#[derive(Debug)]
pub struct I2cDevice(I2c);

impl I2cDevice {
    #[tracing::instrument]
    pub fn new(address: u8) -> anyhow::Result<Self> {
        trace!("I2cDevice::new()");

        let mut i2c = I2c::new().context("Create i2c")?;
        i2c.set_slave_address(address as u16).context("Set address")?;

        Ok(I2cDevice(i2c))
    }
}

impl Device for I2cDevice {
    fn read(&mut self, address: u8, buffer: &mut [u8]) -> anyhow::Result<()> {
        self.0.write(&[address]).context("Select register")?;

        let read = self.0.read(buffer).context("Read registers")?;
        ensure!(read == buffer.len(), "Read {read} of {} bytes", buffer.len());

        Ok(())
    }

    fn write(&mut self, address: u8, buffer: &[u8]) -> anyhow::Result<()> {
        let mut message = vec![address];
        message.extend_from_slice(buffer);

        let wrote = self.0.write(&message).context("Write registers")?;
        ensure!(
            wrote == message.len(),
            "Wrote {wrote} of {} bytes",
            message.len()
        );

        Ok(())
    }
}

impl Line for OutputPin {
    fn set_high(&mut self) -> anyhow::Result<()> {
        OutputPin::set_high(self);
        Ok(())
    }

    fn set_low(&mut self) -> anyhow::Result<()> {
        OutputPin::set_low(self);
        Ok(())
    }
}
