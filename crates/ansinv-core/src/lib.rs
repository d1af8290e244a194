//! Core domain types for ansinv.
//!
//! This crate contains:
//! - The typed inventory (`Inventory`, `Group`, `HostId`)
//! - The `HostRecord` trait and its static field descriptors
//! - The built-in `AnsibleHost` record with the common connection variables

pub mod ansible;
pub mod error;
pub mod host;
pub mod inventory;

pub use ansible::{AnsibleHost, Connection};
pub use error::{Error, Result};
pub use host::{FieldKind, FieldSpec, FieldValue, HostRecord};
pub use inventory::{Group, GroupView, HostId, Inventory};
