//! CLI command implementations.

pub mod hosts;
pub mod vars;

use ansinv_core::{AnsibleHost, Inventory};
use ansinv_parser::{CoercionPolicy, parse_file};
use anyhow::{Context as _, Result};
use tracing::debug;

/// Options shared by every command.
pub struct Context {
    pub inventory: String,
    pub policy: Option<String>,
    pub json: bool,
}

impl Context {
    pub fn policy(&self) -> Result<CoercionPolicy> {
        match &self.policy {
            Some(path) => CoercionPolicy::load(path)
                .with_context(|| format!("Failed to load policy: {}", path)),
            None => Ok(CoercionPolicy::default()),
        }
    }

    pub fn load(&self) -> Result<Inventory<AnsibleHost>> {
        let policy = self.policy()?;
        debug!(inventory = %self.inventory, "Loading inventory");
        parse_file(&self.inventory, &policy)
            .with_context(|| format!("Failed to parse inventory: {}", self.inventory))
    }
}

pub fn validate(ctx: &Context) -> Result<()> {
    match ctx.load() {
        Ok(inventory) => {
            println!(
                "Inventory is valid: {} groups, {} hosts",
                inventory.len(),
                inventory.hosts().len()
            );
            Ok(())
        }
        Err(e) => {
            println!("Inventory error: {:#}", e);
            std::process::exit(1);
        }
    }
}
