use std::thread;
use std::time::Duration;

use anyhow::Context;
use tracing::trace;

use crate::peripheral::Device;
use crate::types::{Degrees, EulerAngles};

pub const BNO055_ADDRESS: u8        = 0x28;

pub const BNO055_OPR_MODE: u8       = 0x3D;
pub const BNO055_SYS_TRIGGER: u8    = 0x3F;
pub const BNO055_EULER_H_LSB: u8    = 0x1A;

pub const OPR_MODE_CONFIG: u8       = 0x00;
pub const OPR_MODE_NDOF: u8         = 0x0C;
pub const SYS_TRIGGER_EXT_CLK: u8   = 0x80;

/// Time the chip needs to apply a mode-register write
const SETTLE: Duration = Duration::from_millis(25);

/// Euler registers count in 1/16 degree steps
const EULER_SCALE: f64 = 16.0;

pub struct Bno055<D> {
    bus: D,
    settle: Duration,
}

impl<D: Device> Bno055<D> {
    pub fn new(bus: D) -> Self {
        Bno055 { bus, settle: SETTLE }
    }

    /// Replaces the post-write settle delay, mostly useful in tests
    pub fn with_settle(bus: D, settle: Duration) -> Self {
        Bno055 { bus, settle }
    }

    /// Brings the chip from its power-on (or unknown) state into fused NDOF
    /// mode: config mode, external oscillator select, then NDOF.
    ///
    /// Stops at the first failed write and leaves the chip in whatever mode
    /// it reached. The mode is never re-checked afterwards, so reading before
    /// a successful `begin` yields garbage angles with no error.
    #[tracing::instrument(skip(self))]
    pub fn begin(&mut self) -> anyhow::Result<()> {
        trace!("Bno055::begin()");

        self.write_settled(BNO055_OPR_MODE, OPR_MODE_CONFIG)
            .context("Enter config mode")?;
        self.write_settled(BNO055_SYS_TRIGGER, SYS_TRIGGER_EXT_CLK)
            .context("Select external oscillator")?;
        self.write_settled(BNO055_OPR_MODE, OPR_MODE_NDOF)
            .context("Enter NDOF mode")?;

        Ok(())
    }

    /// Reads the 6-byte Euler block in one transaction. A bus error or short
    /// read fails the whole call and produces no angles.
    pub fn read_orientation(&mut self) -> anyhow::Result<EulerAngles> {
        let mut buffer = [0; 6];
        self.bus
            .read(BNO055_EULER_H_LSB, &mut buffer)
            .context("Read euler block")?;

        Ok(EulerAngles {
            heading: Degrees(((buffer[1] as i16) << 8 | buffer[0] as i16) as f64 / EULER_SCALE),
            roll: Degrees(((buffer[3] as i16) << 8 | buffer[2] as i16) as f64 / EULER_SCALE),
            pitch: Degrees(((buffer[5] as i16) << 8 | buffer[4] as i16) as f64 / EULER_SCALE),
        })
    }

    fn write_settled(&mut self, address: u8, byte: u8) -> anyhow::Result<()> {
        self.bus.write_byte(address, byte)?;
        thread::sleep(self.settle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::bail;

    use super::*;

    /// Records register writes and serves a canned euler block
    #[derive(Default)]
    struct MockBus {
        writes: Vec<(u8, u8)>,
        fail_write: Option<usize>,
        euler: [u8; 6],
        short_read: bool,
    }

    impl Device for MockBus {
        fn read(&mut self, address: u8, buffer: &mut [u8]) -> anyhow::Result<()> {
            assert_eq!(address, BNO055_EULER_H_LSB);
            if self.short_read {
                bail!("Read 3 of {} bytes", buffer.len());
            }
            buffer.copy_from_slice(&self.euler);
            Ok(())
        }

        fn write(&mut self, address: u8, buffer: &[u8]) -> anyhow::Result<()> {
            if self.fail_write == Some(self.writes.len()) {
                bail!("Address nack");
            }
            self.writes.push((address, buffer[0]));
            Ok(())
        }
    }

    fn driver(bus: MockBus) -> Bno055<MockBus> {
        Bno055::with_settle(bus, Duration::ZERO)
    }

    #[test]
    fn begin_writes_the_mode_sequence() {
        let mut bno = driver(MockBus::default());
        bno.begin().unwrap();

        assert_eq!(
            bno.bus.writes,
            [
                (BNO055_OPR_MODE, OPR_MODE_CONFIG),
                (BNO055_SYS_TRIGGER, SYS_TRIGGER_EXT_CLK),
                (BNO055_OPR_MODE, OPR_MODE_NDOF),
            ]
        );
    }

    #[test]
    fn begin_stops_at_the_first_failed_write() {
        for fail_at in 0..3 {
            let bus = MockBus {
                fail_write: Some(fail_at),
                ..MockBus::default()
            };

            let mut bno = driver(bus);
            assert!(bno.begin().is_err());
            assert_eq!(bno.bus.writes.len(), fail_at);
        }
    }

    #[test]
    fn decodes_sixteenths_of_a_degree() {
        let bus = MockBus {
            euler: [0x00, 0x05, 0x00, 0x00, 0x00, 0x00],
            ..MockBus::default()
        };

        let angles = driver(bus).read_orientation().unwrap();
        assert_eq!(angles.heading, Degrees(80.0));
        assert_eq!(angles.roll, Degrees(0.0));
        assert_eq!(angles.pitch, Degrees(0.0));
    }

    #[test]
    fn decodes_negative_angles() {
        // -16 raw on each axis
        let bus = MockBus {
            euler: [0xF0, 0xFF, 0xF0, 0xFF, 0xF0, 0xFF],
            ..MockBus::default()
        };

        let angles = driver(bus).read_orientation().unwrap();
        assert_eq!(angles.heading, Degrees(-1.0));
        assert_eq!(angles.roll, Degrees(-1.0));
        assert_eq!(angles.pitch, Degrees(-1.0));
    }

    #[test]
    fn short_read_produces_no_angles() {
        let bus = MockBus {
            short_read: true,
            euler: [0x00, 0x05, 0x00, 0x00, 0x00, 0x00],
            ..MockBus::default()
        };

        assert!(driver(bus).read_orientation().is_err());
    }
}
