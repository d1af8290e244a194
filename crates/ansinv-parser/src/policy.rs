//! Coercion policy: how raw keys map to fields and how booleans read.
//!
//! The policy is a plain value passed to every parse, so parses with
//! different policies never interfere. It can be loaded from KDL:
//!
//! ```kdl
//! policy {
//!     case-insensitive #true
//!     naming "snake_case"
//!     truthy "true" "yes" "on"
//! }
//! ```

use ansinv_core::FieldSpec;
use kdl::{KdlDocument, KdlNode};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::{ParseError, ParseResult};

/// How a declared field name becomes the raw key it matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamingConvention {
    /// `AnsiblePort` matches `ansible_port`.
    #[default]
    SnakeCase,
    /// The declared name is used as written.
    Verbatim,
}

impl NamingConvention {
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::SnakeCase => to_snake_case(name),
            Self::Verbatim => name.to_string(),
        }
    }
}

impl FromStr for NamingConvention {
    type Err = ParseError;

    fn from_str(s: &str) -> ParseResult<Self> {
        match s {
            "snake_case" | "snake-case" => Ok(Self::SnakeCase),
            "verbatim" => Ok(Self::Verbatim),
            other => Err(ParseError::InvalidPolicy {
                setting: "naming".to_string(),
                message: format!("unknown naming convention: {}", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionPolicy {
    /// Match raw keys and enum values ignoring case.
    pub case_insensitive: bool,
    pub naming: NamingConvention,
    /// Lower-cased values read as `true`; anything else is `false`.
    pub truthy: Vec<String>,
}

impl Default for CoercionPolicy {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            naming: NamingConvention::SnakeCase,
            truthy: vec!["true".to_string(), "yes".to_string()],
        }
    }
}

impl CoercionPolicy {
    /// Raw key the field is matched against, already case-folded.
    pub fn key_for(&self, spec: &FieldSpec) -> String {
        let key = match spec.alias {
            Some(alias) => alias.to_string(),
            None => self.naming.apply(spec.name),
        };
        self.fold(&key)
    }

    /// Case-fold `key` when the policy is case-insensitive.
    pub fn fold(&self, key: &str) -> String {
        if self.case_insensitive {
            key.to_lowercase()
        } else {
            key.to_string()
        }
    }

    pub fn is_truthy(&self, raw: &str) -> bool {
        let value = raw.to_lowercase();
        self.truthy.iter().any(|t| *t == value)
    }

    /// Load a policy from a KDL file.
    pub fn load(path: impl AsRef<Path>) -> ParseResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading coercion policy");
        let text = std::fs::read_to_string(path)?;
        Self::from_kdl(&text)
    }

    /// Parse a policy from KDL text. Settings that are absent keep their defaults.
    pub fn from_kdl(kdl: &str) -> ParseResult<Self> {
        let doc: KdlDocument = kdl.parse()?;
        let mut policy = Self::default();

        for node in doc.nodes() {
            if node.name().value() != "policy" {
                continue;
            }
            let Some(children) = node.children() else {
                continue;
            };
            for child in children.nodes() {
                match child.name().value() {
                    "case-insensitive" | "case_insensitive" => {
                        policy.case_insensitive = get_first_bool_arg(child).ok_or_else(|| {
                            invalid("case-insensitive", "expected #true or #false")
                        })?;
                    }
                    "naming" => {
                        let naming = get_first_string_arg(child)
                            .ok_or_else(|| invalid("naming", "expected a string"))?;
                        policy.naming = naming.parse()?;
                    }
                    "truthy" => {
                        let truthy = get_all_string_args(child);
                        if truthy.is_empty() {
                            return Err(invalid("truthy", "expected at least one value"));
                        }
                        policy.truthy = truthy.iter().map(|t| t.to_lowercase()).collect();
                    }
                    _ => {}
                }
            }
        }

        Ok(policy)
    }
}

fn invalid(setting: &str, message: &str) -> ParseError {
    ParseError::InvalidPolicy {
        setting: setting.to_string(),
        message: message.to_string(),
    }
}

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_first_bool_arg(node: &KdlNode) -> Option<bool> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_bool())
}

fn get_all_string_args(node: &KdlNode) -> Vec<String> {
    node.entries()
        .iter()
        .filter(|e| e.name().is_none())
        .filter_map(|e| e.value().as_string())
        .map(|s| s.to_string())
        .collect()
}

/// Convert `PascalCase` / `camelCase` to `snake_case`.
///
/// Acronyms stay together: `HTTPPort` becomes `http_port`. Names already in
/// snake_case are returned unchanged.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                None | Some('_') => false,
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                Some(_) => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
