//! Lookup table from port numbers to schemas

use crate::error::{DecodeError, Result};
use crate::ports::Port;
use crate::schema::PortSchema;
use std::collections::HashMap;

/// Port schemas available to a decoder
///
/// Built once at startup and read-only afterwards; every schema is validated
/// when it is registered, never per telegram.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<u32, &'static PortSchema>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        SchemaRegistry {
            schemas: HashMap::new(),
        }
    }

    /// Registry holding the schema of every built-in [`Port`]
    pub fn standard() -> Self {
        // built-in schemas are checked at compile time
        let schemas = Port::ALL
            .iter()
            .map(|port| (port.number(), port.schema()))
            .collect();
        SchemaRegistry { schemas }
    }

    /// Register a schema, replacing any schema already bound to its port
    pub fn register(&mut self, schema: &'static PortSchema) -> Result<()> {
        schema.validate()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            port = schema.port,
            size = schema.size,
            fields = schema.fields.len(),
            "registered port schema"
        );

        self.schemas.insert(schema.port, schema);
        Ok(())
    }

    /// Register several schemas, stopping at the first invalid one
    pub fn register_all(&mut self, schemas: &[&'static PortSchema]) -> Result<()> {
        for &schema in schemas {
            self.register(schema)?;
        }
        Ok(())
    }

    /// Remove the schema bound to `port`
    pub fn unregister(&mut self, port: u32) -> Option<&'static PortSchema> {
        self.schemas.remove(&port)
    }

    /// Get the schema bound to `port`
    pub fn get(&self, port: u32) -> Option<&'static PortSchema> {
        self.schemas.get(&port).copied()
    }

    /// Like [`get`](Self::get), failing with `UnsupportedPort`
    pub fn lookup(&self, port: u32) -> Result<&'static PortSchema> {
        self.get(port).ok_or(DecodeError::UnsupportedPort(port))
    }

    /// Check if a schema is bound to `port`
    pub fn contains(&self, port: u32) -> bool {
        self.schemas.contains_key(&port)
    }

    /// Registered port numbers in ascending order
    pub fn ports(&self) -> Vec<u32> {
        let mut ports: Vec<u32> = self.schemas.keys().copied().collect();
        ports.sort_unstable();
        ports
    }

    /// Number of registered ports
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether no port is registered
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
