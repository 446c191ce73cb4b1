//! CRC16/CCITT-FALSE as used by the EMV QR checksum field (tag `63`).

const INITIAL: u32 = 0xFFFF;
const POLYNOMIAL: u32 = 0x1021;

/// Computes the raw 16-bit checksum over the UTF-16 code units of `input`.
pub fn crc16_value(input: &str) -> u16 {
    let mut crc = INITIAL;
    for unit in input.encode_utf16() {
        crc ^= u32::from(unit) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
        // Bits above 16 never feed back into the low half.
        crc &= 0xFFFF;
    }
    crc as u16
}

/// Computes the checksum of `input` as 4 uppercase, zero-padded hex digits.
pub fn crc16(input: &str) -> String {
    format!("{:04X}", crc16_value(input))
}
