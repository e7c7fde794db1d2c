//! DS18B20 digital thermometers on a 1-Wire bus
//!
//! All sensors convert at once (Skip ROM + Convert T), then each
//! scratchpad is read individually with Match ROM. Only devices with the
//! DS18B20 family code are considered.
//!
//! Scratchpad layout (9 bytes):
//!
//! | byte | content                       |
//! |------|-------------------------------|
//! | 0-1  | temperature, LSB first        |
//! | 2-3  | alarm thresholds TH, TL       |
//! | 4    | configuration (resolution)    |
//! | 5-7  | reserved                      |
//! | 8    | CRC-8 of bytes 0-7            |

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use cradle_core::traits::{AmbientSensorBus, BusError, SensorId, SensorSample, MAX_AMBIENT_SENSORS};
use cradle_hal::onewire::{OneWireBus, OneWireError, RomId};

/// DS18B20 family code (first ROM byte)
pub const FAMILY_CODE: u8 = 0x28;

/// Function command: start a temperature conversion
pub const CONVERT_T: u8 = 0x44;
/// Function command: read the 9-byte scratchpad
pub const READ_SCRATCHPAD: u8 = 0xBE;

/// Worst-case conversion time at 12-bit resolution
pub const CONVERSION_TIME_MS: u32 = 750;

/// Temperature register value at power-on (85 °C), before any conversion
const POWER_ON_RAW: i16 = 0x0550;

/// Resolution of the temperature register (°C per LSB)
pub const RESOLUTION_C: f32 = 0.0625;

/// Scratchpad decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScratchpadError {
    /// CRC mismatch or all-zero data (shorted line)
    Crc,
    /// Register still holds the power-on value; no conversion happened
    NotConverted,
}

/// Dallas/Maxim CRC-8 (polynomial x^8 + x^5 + x^4 + 1, reflected)
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut b = byte;
        for _ in 0..8 {
            let mix = (crc ^ b) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            b >>= 1;
        }
    }
    crc
}

/// Decode a scratchpad into degrees Celsius
pub fn decode_scratchpad(scratchpad: &[u8; 9]) -> Result<f32, ScratchpadError> {
    if scratchpad.iter().all(|&b| b == 0) || crc8(&scratchpad[..8]) != scratchpad[8] {
        return Err(ScratchpadError::Crc);
    }

    let raw = i16::from_le_bytes([scratchpad[0], scratchpad[1]]);
    if raw == POWER_ON_RAW {
        return Err(ScratchpadError::NotConverted);
    }

    Ok(raw as f32 * RESOLUTION_C)
}

fn bus_error(err: OneWireError) -> BusError {
    match err {
        OneWireError::NoPresence => BusError::NoPresence,
        OneWireError::Io => BusError::Io,
    }
}

fn read_scratchpad<W: OneWireBus>(wire: &mut W, rom: &RomId) -> Result<[u8; 9], OneWireError> {
    wire.select(rom)?;
    wire.write_byte(READ_SCRATCHPAD)?;

    let mut scratchpad = [0u8; 9];
    for byte in scratchpad.iter_mut() {
        *byte = wire.read_byte()?;
    }
    Ok(scratchpad)
}

/// Every DS18B20 on one 1-Wire bus
///
/// Sensors are re-enumerated each cycle, so devices may be added or
/// removed while running.
pub struct Ds18b20Bus<W, D> {
    wire: W,
    delay: D,
    roms: Vec<RomId, MAX_AMBIENT_SENSORS>,
}

impl<W: OneWireBus, D: DelayNs> Ds18b20Bus<W, D> {
    /// Create a new bus driver
    pub fn new(wire: W, delay: D) -> Self {
        Self {
            wire,
            delay,
            roms: Vec::new(),
        }
    }

    /// Sensors found during the latest read
    pub fn devices(&self) -> &[RomId] {
        &self.roms
    }

    /// Release the underlying bus and delay
    pub fn release(self) -> (W, D) {
        (self.wire, self.delay)
    }
}

impl<W: OneWireBus, D: DelayNs> AmbientSensorBus for Ds18b20Bus<W, D> {
    fn read_all(
        &mut self,
        out: &mut Vec<SensorSample, MAX_AMBIENT_SENSORS>,
    ) -> Result<(), BusError> {
        self.roms.clear();
        self.wire.search(&mut self.roms).map_err(bus_error)?;
        self.roms.retain(|rom| rom.family_code() == FAMILY_CODE);

        if self.roms.is_empty() {
            return Ok(());
        }

        self.wire.skip().map_err(bus_error)?;
        self.wire.write_byte(CONVERT_T).map_err(bus_error)?;
        self.delay.delay_ms(CONVERSION_TIME_MS);

        for rom in self.roms.iter() {
            let scratchpad = match read_scratchpad(&mut self.wire, rom) {
                Ok(scratchpad) => scratchpad,
                Err(err) => {
                    warn!("ds18b20 {}: read failed: {}", rom, err);
                    continue;
                }
            };

            match decode_scratchpad(&scratchpad) {
                Ok(celsius) => {
                    // Capacity matches the ROM list, so this cannot overflow
                    let _ = out.push(SensorSample {
                        id: SensorId(rom.as_u64()),
                        celsius,
                    });
                }
                Err(err) => warn!("ds18b20 {}: skipped: {}", rom, err),
            }
        }

        Ok(())
    }
}
