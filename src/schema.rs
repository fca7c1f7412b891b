//! Port schemas: the field tables that drive decoding

use crate::core::{BitAddress, DecodedTelegram, Telegram, Value};
use crate::encoding::MAX_FIELD_WIDTH;
use crate::error::{DecodeError, Result};

/// `raw * scale + offset` in floating point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub scale: f64,
    pub offset: f64,
}

impl Affine {
    /// Create a new affine formula
    pub const fn new(scale: f64, offset: f64) -> Self {
        Affine { scale, offset }
    }

    /// Evaluate the formula for `raw`
    pub fn apply(&self, raw: i64) -> f64 {
        raw as f64 * self.scale + self.offset
    }
}

/// How a raw field value becomes a physical value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Raw integer as-is
    Raw,
    /// `raw * scale + offset`, kept integral
    Integer { scale: i64, offset: i64 },
    /// `raw * scale + offset` in floating point
    Float(Affine),
    /// `(raw - bias) * scale`
    Biased { bias: i64, scale: f64 },
    /// Pick one of two affine formulas by a flag bit of the same telegram
    Switch {
        flag: BitAddress,
        set: Affine,
        clear: Affine,
    },
}

impl Transform {
    /// Apply the transform to an extracted raw value
    pub fn apply(&self, raw: i64, telegram: &Telegram<'_>) -> Value {
        match *self {
            Transform::Raw => Value::Int(raw),
            Transform::Integer { scale, offset } => {
                Value::Int(raw.saturating_mul(scale).saturating_add(offset))
            }
            Transform::Float(affine) => Value::Float(affine.apply(raw)),
            Transform::Biased { bias, scale } => Value::Float(raw.saturating_sub(bias) as f64 * scale),
            Transform::Switch { flag, set, clear } => {
                if telegram.flag(flag) {
                    Value::Float(set.apply(raw))
                } else {
                    Value::Float(clear.apply(raw))
                }
            }
        }
    }
}

/// Whether a field is read as unsigned or two's complement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signedness {
    Unsigned,
    Signed,
}

/// Where a field's value comes from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Read from the telegram's bits
    Bits {
        address: BitAddress,
        signedness: Signedness,
        transform: Transform,
    },
    /// `total` minus the sum of earlier sibling fields
    Remainder {
        total: f64,
        of: &'static [&'static str],
    },
}

/// One named entry in a port schema
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Unsigned field used as-is
    pub const fn raw(name: &'static str, address: BitAddress) -> Self {
        Self::unsigned(name, address, Transform::Raw)
    }

    /// Unsigned field with a transform
    pub const fn unsigned(name: &'static str, address: BitAddress, transform: Transform) -> Self {
        FieldSpec {
            name,
            kind: FieldKind::Bits {
                address,
                signedness: Signedness::Unsigned,
                transform,
            },
        }
    }

    /// Two's-complement field with a transform
    pub const fn signed(name: &'static str, address: BitAddress, transform: Transform) -> Self {
        FieldSpec {
            name,
            kind: FieldKind::Bits {
                address,
                signedness: Signedness::Signed,
                transform,
            },
        }
    }

    /// Derived field: `total` minus the named siblings
    pub const fn remainder(name: &'static str, total: f64, of: &'static [&'static str]) -> Self {
        FieldSpec {
            name,
            kind: FieldKind::Remainder { total, of },
        }
    }

    /// Bit address backing the field, `None` for derived fields
    pub fn address(&self) -> Option<BitAddress> {
        match self.kind {
            FieldKind::Bits { address, .. } => Some(address),
            FieldKind::Remainder { .. } => None,
        }
    }

    /// Check if the field is computed from siblings
    pub fn is_derived(&self) -> bool {
        matches!(self.kind, FieldKind::Remainder { .. })
    }
}

/// Static layout of one port's telegrams
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortSchema {
    pub port: u32,
    /// Message type reported with every decoded telegram
    pub message_type: &'static str,
    /// Telegram length in bytes
    pub size: usize,
    pub fields: &'static [FieldSpec],
}

impl PortSchema {
    /// Compile-time usable consistency check
    ///
    /// Every bit address must be well formed, fit `size` and be at most 64
    /// bits wide (63 for unsigned fields). Switch flags must be single bits.
    /// Derived fields may only reference fields declared before them.
    pub const fn check(&self) -> std::result::Result<(), &'static str> {
        let mut i = 0;
        while i < self.fields.len() {
            match self.fields[i].kind {
                FieldKind::Bits {
                    address,
                    signedness,
                    transform,
                } => {
                    if !address.is_well_formed() {
                        return Err("bit address is reversed or uses a bit index above 7");
                    }
                    if !address.fits(self.size) {
                        return Err("bit address exceeds the telegram size");
                    }
                    let limit = match signedness {
                        Signedness::Signed => MAX_FIELD_WIDTH,
                        Signedness::Unsigned => MAX_FIELD_WIDTH - 1,
                    };
                    if address.width() > limit {
                        return Err("field is too wide for a 64-bit value");
                    }
                    if let Transform::Switch { flag, .. } = transform {
                        if !flag.is_well_formed() || !flag.fits(self.size) || flag.width() != 1 {
                            return Err("switch flag must be a single bit inside the telegram");
                        }
                    }
                }
                FieldKind::Remainder { of, .. } => {
                    let mut j = 0;
                    while j < of.len() {
                        if !declared_before(self.fields, i, of[j]) {
                            return Err("derived field references a field not declared before it");
                        }
                        j += 1;
                    }
                }
            }
            i += 1;
        }
        Ok(())
    }

    /// Validate the schema, reporting the first offending field
    pub fn validate(&self) -> Result<()> {
        let fields: &'static [FieldSpec] = self.fields;
        for (index, field) in fields.iter().enumerate() {
            let single = PortSchema {
                fields: &fields[..=index],
                ..*self
            };
            if let Err(reason) = single.check() {
                return Err(DecodeError::schema_definition(format!(
                    "port {} field '{}': {}",
                    self.port, field.name, reason
                )));
            }
        }
        Ok(())
    }

    /// Look up a field definition by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Decode one telegram of this port
    ///
    /// The schema is checked first, so a table that never went through a
    /// registry fails with `SchemaDefinition` instead of reading past the
    /// telegram or dropping unknown siblings of a derived field.
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedTelegram> {
        if self.check().is_err() {
            self.validate()?;
        }
        self.decode_checked(bytes)
    }

    /// Decode with a schema already validated by a registry
    pub(crate) fn decode_checked(&self, bytes: &[u8]) -> Result<DecodedTelegram> {
        let telegram = Telegram::new(bytes, self.size)?;
        let mut decoded = DecodedTelegram::with_capacity(self.port, self.message_type, self.fields.len());

        for field in self.fields {
            let value = match field.kind {
                FieldKind::Bits {
                    address,
                    signedness,
                    transform,
                } => {
                    let raw = match signedness {
                        Signedness::Unsigned => telegram.unsigned(address) as i64,
                        Signedness::Signed => telegram.signed(address),
                    };
                    transform.apply(raw, &telegram)
                }
                FieldKind::Remainder { total, of } => {
                    let used: f64 = of.iter().filter_map(|name| decoded.get_f64(name)).sum();
                    Value::Float(total - used)
                }
            };
            decoded.push(field.name, value);
        }

        Ok(decoded)
    }
}

const fn declared_before(fields: &[FieldSpec], index: usize, name: &str) -> bool {
    let mut i = 0;
    while i < index {
        if str_eq(fields[i].name, name) {
            return true;
        }
        i += 1;
    }
    false
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}
