//! Host record schema.
//!
//! A host type declares its fields once, statically, through
//! [`HostRecord::FIELDS`]. The parser resolves those descriptors into lookup
//! keys before it reads any line and hands each coerced value back through
//! [`HostRecord::set_field`].

use derive_more::Display;

use crate::Result;

/// The type a raw text value is coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Kept verbatim.
    String,
    /// Parsed as a signed 64-bit integer.
    Integer,
    /// Truthy/falsy text; never fails.
    Boolean,
    /// One of a fixed set of names.
    Enum(&'static [&'static str]),
}

/// Static description of one typed host field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Name passed back to [`HostRecord::set_field`].
    pub name: &'static str,
    pub kind: FieldKind,
    /// Raw key to match instead of the name converted by the naming policy.
    pub alias: Option<&'static str>,
}

impl FieldSpec {
    pub const fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub const fn variant(name: &'static str, variants: &'static [&'static str]) -> Self {
        Self::new(name, FieldKind::Enum(variants))
    }

    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            alias: None,
        }
    }

    /// Match the raw key `alias` verbatim (subject to case folding only).
    pub const fn with_alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }
}

/// A coerced value, ready to be stored on a record.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum FieldValue {
    #[display("{_0}")]
    String(String),
    #[display("{_0}")]
    Integer(i64),
    #[display("{_0}")]
    Boolean(bool),
    /// The declared variant name that matched.
    #[display("{_0}")]
    Variant(&'static str),
}

impl FieldValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Boolean(_) => "boolean",
            Self::Variant(_) => "enum",
        }
    }
}

/// A typed host entry produced from one resolved inventory record.
///
/// `Default` supplies the value of every field absent from the inventory.
pub trait HostRecord: Default {
    /// Typed fields, excluding the hostname.
    const FIELDS: &'static [FieldSpec];

    fn hostname(&self) -> &str;

    fn set_hostname(&mut self, hostname: String);

    /// Store `value` for the field declared as `name`.
    ///
    /// The value always has the kind declared in [`Self::FIELDS`]; records may
    /// still reject it, e.g. an integer outside the field's range.
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()>;
}
