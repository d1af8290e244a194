//! Schema-driven coercion of raw records into typed hosts.

use std::collections::HashSet;

use ansinv_core::{FieldKind, FieldSpec, FieldValue, HostRecord};
use tracing::trace;

use crate::policy::CoercionPolicy;
use crate::raw::HOSTNAME_KEY;
use crate::resolver::HostEntry;
use crate::{ParseError, ParseResult};

#[derive(Debug, Clone)]
struct SchemaField {
    spec: FieldSpec,
    key: String,
}

/// Field descriptors of a host type resolved against a policy.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<SchemaField>,
    policy: CoercionPolicy,
}

impl Schema {
    pub fn resolve<T: HostRecord>(policy: &CoercionPolicy) -> Self {
        let fields = T::FIELDS
            .iter()
            .map(|spec| SchemaField {
                spec: *spec,
                key: policy.key_for(spec),
            })
            .collect();

        Self {
            fields,
            policy: policy.clone(),
        }
    }

    /// Field matching the raw key, if any.
    pub fn field_for(&self, raw_key: &str) -> Option<&FieldSpec> {
        let key = self.policy.fold(raw_key);
        self.fields
            .iter()
            .find(|field| field.key == key)
            .map(|field| &field.spec)
    }

    /// Build a typed host from one resolved record.
    ///
    /// Raw keys are visited in record order, so when several keys fold to the
    /// same field the first one (the host's own line before inherited vars)
    /// is the one assigned.
    pub fn coerce<T: HostRecord>(&self, entry: &HostEntry) -> ParseResult<T> {
        let record = &entry.record;
        let hostname = record.hostname().unwrap_or_default();
        let mut host = T::default();
        host.set_hostname(hostname.to_string());

        let invalid = |field: &str, message: String| ParseError::InvalidValue {
            group: entry.origin.clone(),
            hostname: hostname.to_string(),
            line: record.line,
            field: field.to_string(),
            message,
        };

        let mut assigned = HashSet::new();
        for (key, raw) in &record.vars {
            if self.policy.fold(key) == HOSTNAME_KEY {
                continue;
            }
            let Some(spec) = self.field_for(key) else {
                trace!(hostname, key = %key, "Dropping unmapped variable");
                continue;
            };
            if !assigned.insert(spec.name) {
                trace!(hostname, key = %key, field = spec.name, "Field already assigned");
                continue;
            }

            let value = self
                .coerce_value(spec, raw)
                .map_err(|message| invalid(spec.name, message))?;
            host.set_field(spec.name, value)
                .map_err(|e| invalid(spec.name, e.to_string()))?;
        }

        Ok(host)
    }

    fn coerce_value(&self, spec: &FieldSpec, raw: &str) -> Result<FieldValue, String> {
        match spec.kind {
            FieldKind::String => Ok(FieldValue::String(raw.to_string())),
            FieldKind::Integer => raw
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|e| format!("'{}' is not an integer: {}", raw, e)),
            FieldKind::Boolean => Ok(FieldValue::Boolean(self.policy.is_truthy(raw))),
            FieldKind::Enum(variants) => variants
                .iter()
                .find(|variant| {
                    if self.policy.case_insensitive {
                        variant.eq_ignore_ascii_case(raw)
                    } else {
                        **variant == raw
                    }
                })
                .map(|variant| FieldValue::Variant(*variant))
                .ok_or_else(|| {
                    format!("'{}' is not one of: {}", raw, variants.join(", "))
                }),
        }
    }
}
