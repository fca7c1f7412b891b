//! Core types and structures for tracker telegrams

use crate::encoding::BitExtractor;
use crate::error::{DecodeError, Result};

/// Inclusive bit range inside a telegram
///
/// Bytes are numbered from the least significant (index 0) and bits within a
/// byte from the least significant (bit 0) to the most significant (bit 7),
/// as if the whole telegram were one little-endian integer.
/// `(start_byte, start_bit)` is the least significant bit of the field and
/// `(end_byte, end_bit)` the most significant one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitAddress {
    pub start_byte: usize,
    pub start_bit: u8,
    pub end_byte: usize,
    pub end_bit: u8,
}

impl BitAddress {
    /// Create a new bit address, validating bit indices and bound order
    pub fn new(start_byte: usize, start_bit: u8, end_byte: usize, end_bit: u8) -> Result<Self> {
        let address = Self::new_unchecked(start_byte, start_bit, end_byte, end_bit);
        if !address.is_well_formed() {
            return Err(DecodeError::schema_definition(format!(
                "Bit address {} is reversed or uses a bit index above 7",
                address
            )));
        }
        Ok(address)
    }

    /// Create a bit address without validation
    ///
    /// Used by the static port tables, which are checked at compile time.
    pub const fn new_unchecked(start_byte: usize, start_bit: u8, end_byte: usize, end_bit: u8) -> Self {
        BitAddress {
            start_byte,
            start_bit,
            end_byte,
            end_bit,
        }
    }

    /// Address of a single bit
    pub const fn bit(byte: usize, bit: u8) -> Self {
        Self::new_unchecked(byte, bit, byte, bit)
    }

    /// Address spanning whole bytes `first..=last`
    pub const fn bytes(first: usize, last: usize) -> Self {
        Self::new_unchecked(first, 0, last, 7)
    }

    /// Absolute position of the least significant bit
    pub const fn lsb(&self) -> usize {
        self.start_byte * 8 + self.start_bit as usize
    }

    /// Absolute position of the most significant bit
    pub const fn msb(&self) -> usize {
        self.end_byte * 8 + self.end_bit as usize
    }

    /// Number of bits covered; 0 for a reversed address
    pub const fn width(&self) -> usize {
        if self.msb() < self.lsb() {
            0
        } else {
            self.msb() - self.lsb() + 1
        }
    }

    /// Bit indices are in 0..=7 and the end bound is not below the start bound
    pub const fn is_well_formed(&self) -> bool {
        self.start_bit <= 7 && self.end_bit <= 7 && self.msb() >= self.lsb()
    }

    /// The address lies entirely inside a telegram of `size` bytes
    pub const fn fits(&self, size: usize) -> bool {
        self.start_byte < size && self.end_byte < size
    }
}

impl std::fmt::Display for BitAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}.{})..=({}.{})",
            self.start_byte, self.start_bit, self.end_byte, self.end_bit
        )
    }
}

/// A length-checked view of one uplink telegram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Telegram<'a> {
    bytes: &'a [u8],
}

impl<'a> Telegram<'a> {
    /// Wrap `bytes`, which must be exactly `size` bytes long
    pub fn new(bytes: &'a [u8], size: usize) -> Result<Self> {
        if bytes.len() != size {
            return Err(DecodeError::length_mismatch(size, bytes.len()));
        }
        Ok(Telegram { bytes })
    }

    /// Raw telegram bytes
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Telegram length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the telegram has no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read an unsigned field
    ///
    /// The address must fit the telegram; schemas guarantee this before any
    /// telegram reaches them.
    pub fn unsigned(&self, address: BitAddress) -> u64 {
        BitExtractor::read(self.bytes, address)
    }

    /// Read a two's-complement signed field
    pub fn signed(&self, address: BitAddress) -> i64 {
        BitExtractor::to_signed(self.unsigned(address), address.width())
    }

    /// Read a single-bit flag
    pub fn flag(&self, address: BitAddress) -> bool {
        self.unsigned(address) != 0
    }
}

/// A decoded field value
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    /// Numeric value as floating point
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Int(v) => v as f64,
            Value::Float(v) => v,
        }
    }

    /// Integer value, `None` for floating point fields
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(v) => Some(v),
            Value::Float(_) => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
        }
    }
}

/// The ordered result of decoding one telegram
///
/// Fields appear in the order their schema declares them.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTelegram {
    port: u32,
    message_type: &'static str,
    fields: Vec<(&'static str, Value)>,
}

impl DecodedTelegram {
    pub(crate) fn with_capacity(port: u32, message_type: &'static str, capacity: usize) -> Self {
        DecodedTelegram {
            port,
            message_type,
            fields: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &'static str, value: Value) {
        self.fields.push((name, value));
    }

    /// Port the telegram was received on
    pub fn port(&self) -> u32 {
        self.port
    }

    /// Message type of the schema, e.g. `position` or `stats`
    pub fn message_type(&self) -> &'static str {
        self.message_type
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<Value> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| *value)
    }

    /// Look up a field as floating point
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).map(|value| value.as_f64())
    }

    /// Look up an integer field
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|value| value.as_i64())
    }

    /// Field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    /// Fields with their values in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Value)> + '_ {
        self.fields.iter().copied()
    }

    /// Number of decoded fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field was decoded
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DecodedTelegram {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_address_creation() {
        assert!(BitAddress::new(0, 0, 3, 7).is_ok());
        assert!(BitAddress::new(2, 4, 2, 4).is_ok());
        assert!(BitAddress::new(1, 0, 0, 7).is_err());
        assert!(BitAddress::new(0, 8, 1, 0).is_err());
    }

    #[test]
    fn test_bit_address_geometry() {
        let address = BitAddress::new_unchecked(1, 7, 3, 3);
        assert_eq!(address.lsb(), 15);
        assert_eq!(address.msb(), 27);
        assert_eq!(address.width(), 13);
        assert!(address.fits(4));
        assert!(!address.fits(3));

        assert_eq!(BitAddress::bit(4, 2).width(), 1);
        assert_eq!(BitAddress::bytes(5, 6).width(), 16);
        assert_eq!(BitAddress::new_unchecked(1, 0, 0, 0).width(), 0);
    }

    #[test]
    fn test_telegram_length_check() {
        let bytes = [0u8; 8];
        assert!(Telegram::new(&bytes, 8).is_ok());
        assert_eq!(
            Telegram::new(&bytes, 9),
            Err(DecodeError::length_mismatch(9, 8))
        );
    }

    #[test]
    fn test_telegram_reads() {
        let bytes = [0xFF, 0x80];
        let telegram = Telegram::new(&bytes, 2).unwrap();
        assert_eq!(telegram.as_bytes(), &bytes);
        assert_eq!(telegram.len(), 2);
        assert!(!telegram.is_empty());
        assert_eq!(telegram.unsigned(BitAddress::bytes(0, 0)), 0xFF);
        assert_eq!(telegram.signed(BitAddress::bytes(0, 0)), -1);
        assert_eq!(telegram.signed(BitAddress::bytes(0, 1)), -32513);
        assert!(telegram.flag(BitAddress::bit(1, 7)));
        assert!(!telegram.flag(BitAddress::bit(1, 6)));
    }

    #[test]
    fn test_decoded_telegram_lookup() {
        let mut decoded = DecodedTelegram::with_capacity(30, "device_info", 2);
        decoded.push("product_id", Value::Int(98));
        decoded.push("battery", Value::Float(3.25));

        assert_eq!(decoded.get_i64("product_id"), Some(98));
        assert_eq!(decoded.get_f64("product_id"), Some(98.0));
        assert_eq!(decoded.get_i64("battery"), None);
        assert_eq!(decoded.get("missing"), None);
        assert_eq!(decoded.names().collect::<Vec<_>>(), ["product_id", "battery"]);
        assert_eq!(decoded.len(), 2);
        assert!(!decoded.is_empty());
        assert_eq!(
            decoded.iter().collect::<Vec<_>>(),
            [("product_id", Value::Int(98)), ("battery", Value::Float(3.25))]
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_keeps_field_order() {
        let mut decoded = DecodedTelegram::with_capacity(1, "position", 2);
        decoded.push("speed_in_kmh", Value::Int(42));
        decoded.push("heading_in_deg", Value::Float(5.625));
        assert_eq!(
            serde_json::to_string(&decoded).unwrap(),
            r#"{"speed_in_kmh":42,"heading_in_deg":5.625}"#
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Int(7404).to_string(), "7404");
        assert_eq!(Value::Float(5.625).to_string(), "5.625");
    }
}
