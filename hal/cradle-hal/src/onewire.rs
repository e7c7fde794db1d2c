//! Dallas 1-Wire bus abstractions
//!
//! Byte-level bus master operations. Device enumeration (Search ROM) is
//! part of the trait because most masters (DS2482 bridges, the Linux `w1`
//! subsystem, PIO programs) run the search themselves.

use heapless::Vec;

/// ROM command: address a single device by ROM code
pub const MATCH_ROM: u8 = 0x55;
/// ROM command: address every device on the bus
pub const SKIP_ROM: u8 = 0xCC;

/// 64-bit device ROM code
///
/// Byte 0 is the family code, bytes 1-6 the serial number and byte 7 the
/// CRC-8 of the first seven bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RomId(pub [u8; 8]);

impl RomId {
    /// Device family code
    pub const fn family_code(&self) -> u8 {
        self.0[0]
    }

    /// 48-bit serial number
    pub fn serial(&self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes[..6].copy_from_slice(&self.0[1..7]);
        u64::from_le_bytes(bytes)
    }

    /// CRC byte stored in the ROM
    pub const fn crc(&self) -> u8 {
        self.0[7]
    }

    /// ROM code as a single little-endian integer
    pub const fn as_u64(&self) -> u64 {
        u64::from_le_bytes(self.0)
    }
}

/// Errors reported by a 1-Wire bus master
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OneWireError {
    /// No device answered the reset pulse
    NoPresence,
    /// Bus shorted or master reported a transfer failure
    Io,
}

/// 1-Wire bus master
pub trait OneWireBus {
    /// Issue a reset pulse
    ///
    /// Returns `Ok(true)` if at least one device answered with a presence
    /// pulse.
    fn reset(&mut self) -> Result<bool, OneWireError>;

    /// Write one byte, least significant bit first
    fn write_byte(&mut self, byte: u8) -> Result<(), OneWireError>;

    /// Read one byte, least significant bit first
    fn read_byte(&mut self) -> Result<u8, OneWireError>;

    /// Enumerate every device on the bus
    ///
    /// Appends ROM codes to `out` until the bus is exhausted or `out` is
    /// full. Devices beyond capacity are ignored.
    fn search<const N: usize>(&mut self, out: &mut Vec<RomId, N>) -> Result<(), OneWireError>;

    /// Write a sequence of bytes
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), OneWireError> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Reset the bus and address a single device
    fn select(&mut self, rom: &RomId) -> Result<(), OneWireError> {
        if !self.reset()? {
            return Err(OneWireError::NoPresence);
        }
        self.write_byte(MATCH_ROM)?;
        self.write_bytes(&rom.0)
    }

    /// Reset the bus and address every device at once
    fn skip(&mut self) -> Result<(), OneWireError> {
        if !self.reset()? {
            return Err(OneWireError::NoPresence);
        }
        self.write_byte(SKIP_ROM)
    }
}
