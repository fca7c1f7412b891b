//! Bit-field extraction and insertion for tracker telegrams
//!
//! A telegram is treated as one little-endian unsigned integer: byte 0 holds
//! bits 0-7, byte 1 bits 8-15 and so on. A [`BitAddress`] selects an
//! inclusive run of those bits, least significant bound first.

use crate::core::BitAddress;
use crate::error::{DecodeError, Result};

/// Widest field that can be extracted
pub const MAX_FIELD_WIDTH: usize = 64;

/// Reads integers out of arbitrary bit ranges
pub struct BitExtractor;

impl BitExtractor {
    /// Extract an unsigned field
    pub fn unsigned(bytes: &[u8], address: BitAddress) -> Result<u64> {
        check_address(bytes.len(), address)?;
        Ok(Self::read(bytes, address))
    }

    /// Extract a two's-complement signed field
    pub fn signed(bytes: &[u8], address: BitAddress) -> Result<i64> {
        let raw = Self::unsigned(bytes, address)?;
        Ok(Self::to_signed(raw, address.width()))
    }

    /// Extract without checking the address against `bytes`
    ///
    /// Bytes past the end of `bytes` read as zero.
    pub(crate) fn read(bytes: &[u8], address: BitAddress) -> u64 {
        let width = address.width().min(MAX_FIELD_WIDTH);
        if width == 0 {
            return 0;
        }

        // a 64-bit field starting at bit 7 spans at most 9 bytes
        let mut window = 0u128;
        for (i, byte) in (address.start_byte..=address.end_byte).enumerate().take(16) {
            let byte = bytes.get(byte).copied().unwrap_or(0);
            window |= (byte as u128) << (8 * i);
        }
        window >>= address.start_bit;

        (window & mask(width) as u128) as u64
    }

    /// Interpret the low `width` bits of `raw` as two's complement
    pub fn to_signed(raw: u64, width: usize) -> i64 {
        if width == 0 || width >= MAX_FIELD_WIDTH {
            return raw as i64;
        }
        if (raw >> (width - 1)) & 1 == 1 {
            raw as i64 - (1i64 << width)
        } else {
            raw as i64
        }
    }
}

/// Writes integers into arbitrary bit ranges, the inverse of [`BitExtractor`]
pub struct BitInserter;

impl BitInserter {
    /// Store the low `width` bits of `value` at `address`
    ///
    /// Bits outside the address are left untouched, so several fields can be
    /// packed into one buffer.
    pub fn insert(bytes: &mut [u8], address: BitAddress, value: u64) -> Result<()> {
        check_address(bytes.len(), address)?;

        let lsb = address.lsb();
        for i in 0..address.width() {
            let position = lsb + i;
            let bit = 1u8 << (position % 8);
            if (value >> i) & 1 == 1 {
                bytes[position / 8] |= bit;
            } else {
                bytes[position / 8] &= !bit;
            }
        }

        Ok(())
    }

    /// Store a signed value in two's complement
    pub fn insert_signed(bytes: &mut [u8], address: BitAddress, value: i64) -> Result<()> {
        let raw = value as u64 & mask(address.width().min(MAX_FIELD_WIDTH));
        Self::insert(bytes, address, raw)
    }
}

fn mask(width: usize) -> u64 {
    if width >= MAX_FIELD_WIDTH {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

fn check_address(len: usize, address: BitAddress) -> Result<()> {
    if !address.is_well_formed() {
        return Err(DecodeError::schema_definition(format!(
            "Bit address {} is reversed or uses a bit index above 7",
            address
        )));
    }
    if !address.fits(len) {
        return Err(DecodeError::schema_definition(format!(
            "Bit address {} exceeds {}-byte telegram",
            address, len
        )));
    }
    if address.width() > MAX_FIELD_WIDTH {
        return Err(DecodeError::schema_definition(format!(
            "Bit address {} is wider than {} bits",
            address, MAX_FIELD_WIDTH
        )));
    }
    Ok(())
}
