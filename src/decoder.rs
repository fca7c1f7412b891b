//! Port dispatch: routes uplink payloads to their schema

use crate::core::DecodedTelegram;
use crate::error::{DecodeError, Result};
use crate::registry::SchemaRegistry;
use crate::schema::PortSchema;
use std::sync::OnceLock;

/// Telegram decoder bound to a set of port schemas
///
/// Decoding is a pure function of the port and the payload; a `Decoder` can
/// be shared freely between threads.
#[derive(Debug, Clone)]
pub struct Decoder {
    registry: SchemaRegistry,
}

impl Decoder {
    /// Create a decoder for the built-in ports
    pub fn new() -> Self {
        Decoder {
            registry: SchemaRegistry::standard(),
        }
    }

    /// Create a decoder over an already populated registry
    pub fn with_registry(registry: SchemaRegistry) -> Self {
        Decoder { registry }
    }

    /// Schemas this decoder dispatches to
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Decode a hex-encoded payload received on `port`
    ///
    /// The port is resolved before the payload is looked at, so an unknown
    /// port is reported as such even for garbage payloads.
    pub fn decode(&self, port: u32, payload: &str) -> Result<DecodedTelegram> {
        let schema = self.registry.lookup(port)?;
        let bytes = hex::decode(payload)?;
        self.decode_with(schema, &bytes)
    }

    /// Decode a raw payload received on `port`
    pub fn decode_bytes(&self, port: u32, payload: &[u8]) -> Result<DecodedTelegram> {
        let schema = self.registry.lookup(port)?;
        self.decode_with(schema, payload)
    }

    fn decode_with(&self, schema: &PortSchema, payload: &[u8]) -> Result<DecodedTelegram> {
        let result = schema.decode_checked(payload);

        #[cfg(feature = "tracing")]
        match &result {
            Ok(decoded) => tracing::trace!(
                port = schema.port,
                message_type = schema.message_type,
                fields = decoded.len(),
                "decoded telegram"
            ),
            Err(err) => tracing::trace!(port = schema.port, error = %err, "rejected telegram"),
        }

        result
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

enum Change {
    Add(&'static PortSchema),
    Remove(u32),
}

/// Builder for decoders with a customised port set
///
/// Changes are applied in call order, so the last call for a port wins.
pub struct DecoderBuilder {
    registry: SchemaRegistry,
    changes: Vec<Change>,
}

impl DecoderBuilder {
    /// Start from the built-in ports
    pub fn new() -> Self {
        DecoderBuilder {
            registry: SchemaRegistry::standard(),
            changes: Vec::new(),
        }
    }

    /// Start from an empty port set
    pub fn empty() -> Self {
        DecoderBuilder {
            registry: SchemaRegistry::new(),
            changes: Vec::new(),
        }
    }

    /// Add a schema, replacing any schema on the same port
    pub fn with_schema(mut self, schema: &'static PortSchema) -> Self {
        self.changes.push(Change::Add(schema));
        self
    }

    /// Drop support for `port`
    pub fn without_port(mut self, port: u32) -> Self {
        self.changes.push(Change::Remove(port));
        self
    }

    /// Validate the added schemas and build the decoder
    pub fn build(self) -> Result<Decoder> {
        let mut registry = self.registry;
        for change in self.changes {
            match change {
                Change::Add(schema) => registry.register(schema)?,
                Change::Remove(port) => {
                    registry.unregister(port);
                }
            }
        }
        if registry.is_empty() {
            return Err(DecodeError::schema_definition("decoder has no port schemas"));
        }
        Ok(Decoder::with_registry(registry))
    }
}

impl Default for DecoderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn standard() -> &'static Decoder {
    static STANDARD: OnceLock<Decoder> = OnceLock::new();
    STANDARD.get_or_init(Decoder::new)
}

/// Decode a hex-encoded payload with the built-in ports
///
/// ```
/// let decoded = tracker_telegram::decode(30, "010A62010203017A")?;
/// assert_eq!(decoded.get_i64("product_id"), Some(98));
/// assert_eq!(decoded.get_i64("battery_voltage_in_mV"), Some(7404));
/// # Ok::<(), tracker_telegram::DecodeError>(())
/// ```
pub fn decode(port: u32, payload: &str) -> Result<DecodedTelegram> {
    standard().decode(port, payload)
}

/// Decode a raw payload with the built-in ports
pub fn decode_bytes(port: u32, payload: &[u8]) -> Result<DecodedTelegram> {
    standard().decode_bytes(port, payload)
}
