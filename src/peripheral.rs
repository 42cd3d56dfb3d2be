pub mod bno055;
pub mod bus;
pub mod max7219;

/// A chip addressed as a bank of byte-wide registers
pub trait Device {
    fn read_byte(&mut self, address: u8) -> anyhow::Result<u8> {
        let bytes = &mut [0];
        self.read(address, bytes)?;
        Ok(bytes[0])
    }
    fn write_byte(&mut self, address: u8, byte: u8) -> anyhow::Result<()> {
        self.write(address, &[byte])
    }

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> anyhow::Result<()>;
    fn write(&mut self, address: u8, buffer: &[u8]) -> anyhow::Result<()>;
}

/// A single digital output line
pub trait Line {
    fn set_high(&mut self) -> anyhow::Result<()>;
    fn set_low(&mut self) -> anyhow::Result<()>;
}

/// Two-byte opcode+data transaction against a write-only chip
pub trait Interface {
    fn transfer(&mut self, opcode: u8, data: u8) -> anyhow::Result<()>;
}
