//! # Tracker Telegram Decoder
//!
//! A Rust library for decoding the bit-packed uplink telegrams of
//! battery-powered LoRaWAN GPS asset trackers.
//!
//! Every uplink carries a numeric port that selects a fixed telegram layout.
//! This library provides:
//!
//! - Extraction of arbitrary, non byte-aligned bit fields (signed or unsigned)
//! - Static field tables for ports 1, 2, 3, 4, 30 and 31
//! - Scaling of raw integers into physical units
//! - A port dispatcher that tells unsupported ports from malformed payloads
//!
//! Decoding is pure: no I/O, no logging unless the `tracing` feature is on,
//! no shared mutable state.
//!
//! ## Features
//!
//! - `serde`: Enable serialization of decoded telegrams
//! - `tracing`: Emit `tracing` events on decode and schema registration
//!
//! ## Example
//!
//! ```
//! use tracker_telegram::{decode, ErrorKind, Value};
//!
//! let decoded = decode(30, "010A62010203017A")?;
//! assert_eq!(decoded.get("firmware_minor_version"), Some(Value::Int(10)));
//! assert_eq!(decoded.get("battery_voltage_in_mV"), Some(Value::Int(7404)));
//!
//! let err = decode(5, "00").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::UnsupportedPort);
//! # Ok::<(), tracker_telegram::DecodeError>(())
//! ```

pub mod core;
pub mod decoder;
pub mod encoding;
pub mod error;
pub mod ports;
pub mod position;
pub mod registry;
pub mod schema;

pub use self::core::{BitAddress, DecodedTelegram, Telegram, Value};
pub use decoder::{decode, decode_bytes, Decoder, DecoderBuilder};
pub use encoding::{BitExtractor, BitInserter};
pub use error::{DecodeError, ErrorKind, Result};
pub use ports::Port;
pub use position::Position;
pub use registry::SchemaRegistry;
pub use schema::{FieldSpec, PortSchema};
