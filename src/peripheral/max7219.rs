use anyhow::Context;
use tracing::trace;

use crate::peripheral::{Interface, Line};

pub const OP_NOOP: u8        = 0x00;
pub const OP_DIGIT0: u8      = 0x01;
pub const OP_DECODEMODE: u8  = 0x09;
pub const OP_INTENSITY: u8   = 0x0A;
pub const OP_SCANLIMIT: u8   = 0x0B;
pub const OP_SHUTDOWN: u8    = 0x0C;
pub const OP_DISPLAYTEST: u8 = 0x0F;

/// Brightness written during bring-up, dim but visible
const INITIAL_BRIGHTNESS: u8 = 1;

/// Bit-banged three-wire bus to the display chip
pub struct ThreeWire<L> {
    data: L,
    clock: L,
    select: L,
}

impl<L: Line> ThreeWire<L> {
    /// Takes the three output lines and parks chip-select deasserted
    pub fn new(data: L, clock: L, mut select: L) -> anyhow::Result<Self> {
        select.set_high().context("Deassert chip select")?;

        Ok(ThreeWire { data, clock, select })
    }

    fn shift_out(&mut self, byte: u8) -> anyhow::Result<()> {
        // Most significant bit first, data sampled on the clock rise
        for bit in (0..8).rev() {
            if byte >> bit & 1 != 0 {
                self.data.set_high()?;
            } else {
                self.data.set_low()?;
            }

            self.clock.set_high()?;
            self.clock.set_low()?;
        }

        Ok(())
    }
}

impl<L: Line> Interface for ThreeWire<L> {
    fn transfer(&mut self, opcode: u8, data: u8) -> anyhow::Result<()> {
        self.select.set_low().context("Assert chip select")?;
        self.shift_out(opcode).context("Shift opcode")?;
        self.shift_out(data).context("Shift data")?;
        self.select.set_high().context("Deassert chip select")?;

        Ok(())
    }
}

/// 8x8 led matrix behind a MAX7219. The chip is write-only, so `rows` is the
/// only record of what the display shows.
pub struct Max7219<I> {
    interface: I,
    rows: [u8; 8],
}

impl<I: Interface> Max7219<I> {
    /// Brings the chip out of its power-on shutdown state and blanks the
    /// display: test mode off, scan all 8 digits, raw bitmap mode, normal
    /// operation, initial brightness, rows cleared.
    ///
    /// The chip never acknowledges anything, so a disconnected display fails
    /// silently here and everywhere else.
    #[tracing::instrument(skip(interface))]
    pub fn new(mut interface: I) -> anyhow::Result<Self> {
        trace!("Max7219::new()");

        interface
            .transfer(OP_DISPLAYTEST, 0x00)
            .context("Exit test mode")?;
        interface
            .transfer(OP_SCANLIMIT, 0x07)
            .context("Scan all 8 digits")?;
        interface
            .transfer(OP_DECODEMODE, 0x00)
            .context("Raw bitmap mode")?;
        interface
            .transfer(OP_SHUTDOWN, 0x01)
            .context("Exit shutdown")?;

        let mut display = Max7219 {
            interface,
            rows: [0; 8],
        };

        display.set_brightness(INITIAL_BRIGHTNESS)?;

        for row in 0..8 {
            display
                .interface
                .transfer(OP_DIGIT0 + row, 0x00)
                .context("Clear row")?;
        }

        Ok(display)
    }

    /// Sets or clears one pixel and rewrites that row register. Column 0 is
    /// the most significant bit of the row. Out-of-range coordinates are
    /// ignored without touching the chip.
    pub fn set_led(&mut self, row: u8, col: u8, state: bool) -> anyhow::Result<()> {
        if row > 7 || col > 7 {
            return Ok(());
        }

        let mask = 0x80 >> col;
        if state {
            self.rows[row as usize] |= mask;
        } else {
            self.rows[row as usize] &= !mask;
        }

        self.interface
            .transfer(OP_DIGIT0 + row, self.rows[row as usize])
            .context("Write row")
    }

    /// Intensity 1 (dim) to 15 (full). The level is passed through as-is,
    /// the chip masks it to its 4-bit range.
    pub fn set_brightness(&mut self, level: u8) -> anyhow::Result<()> {
        self.interface
            .transfer(OP_INTENSITY, level)
            .context("Write intensity")
    }

    /// Mirror of the 8 row registers
    pub fn rows(&self) -> &[u8; 8] {
        &self.rows
    }
}
