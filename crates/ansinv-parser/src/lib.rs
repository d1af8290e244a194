//! INI inventory parsing for ansinv.
//!
//! This crate handles:
//! - Line cleaning (comments, `"'…'"` literals)
//! - Section building (`[group]`, `[group:vars]`, `[group:children]`)
//! - Group resolution (children flattening, vars inheritance)
//! - Coercion of raw variables into typed host records
//!
//! ```no_run
//! use ansinv_core::AnsibleHost;
//! use ansinv_parser::{CoercionPolicy, parse_file};
//!
//! let inventory = parse_file::<AnsibleHost>("hosts", &CoercionPolicy::default())?;
//! if let Some(web) = inventory.group("web") {
//!     for host in web.hosts() {
//!         println!("{} -> {}", host.hostname, host.address());
//!     }
//! }
//! # Ok::<(), ansinv_parser::ParseError>(())
//! ```

pub mod builder;
pub mod coerce;
pub mod error;
pub mod line;
pub mod policy;
pub mod raw;
pub mod resolver;

pub use coerce::Schema;
pub use error::{ParseError, ParseResult};
pub use policy::{CoercionPolicy, NamingConvention};
pub use resolver::{HostEntry, ResolvedInventory};

use ansinv_core::{Group, HostRecord, Inventory};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Parse inventory lines into typed hosts.
pub fn parse<T, I, S>(lines: I, policy: &CoercionPolicy) -> ParseResult<Inventory<T>>
where
    T: HostRecord,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let resolved = resolve_lines(lines)?;
    let inventory = assemble(resolved, policy)?;
    info!(
        groups = inventory.len(),
        hosts = inventory.hosts().len(),
        "Parsed inventory"
    );
    Ok(inventory)
}

/// Parse inventory text.
pub fn parse_str<T: HostRecord>(text: &str, policy: &CoercionPolicy) -> ParseResult<Inventory<T>> {
    parse(text.lines(), policy)
}

/// Read a UTF-8 inventory file and parse it.
pub fn parse_file<T: HostRecord>(
    path: impl AsRef<Path>,
    policy: &CoercionPolicy,
) -> ParseResult<Inventory<T>> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Reading inventory");
    let lines = read_lines(path)?;
    parse(lines, policy)
}

/// Resolve inventory lines without coercing, keeping every raw variable.
pub fn resolve_lines<I, S>(lines: I) -> ParseResult<ResolvedInventory>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let groups = builder::build_groups(lines)?;
    resolver::resolve(groups)
}

/// [`resolve_lines`] over a UTF-8 file.
pub fn resolve_file(path: impl AsRef<Path>) -> ParseResult<ResolvedInventory> {
    resolve_lines(read_lines(path.as_ref())?)
}

/// Coerce every host once and build the typed groups.
///
/// Groups left without members are omitted.
pub fn assemble<T: HostRecord>(
    resolved: ResolvedInventory,
    policy: &CoercionPolicy,
) -> ParseResult<Inventory<T>> {
    let schema = Schema::resolve::<T>(policy);
    let hosts = resolved
        .hosts
        .iter()
        .map(|entry| schema.coerce::<T>(entry))
        .collect::<ParseResult<Vec<_>>>()?;

    let groups = resolved
        .groups
        .into_iter()
        .filter(|(name, members)| {
            if members.is_empty() {
                debug!(group = %name, "Omitting empty group");
            }
            !members.is_empty()
        })
        .map(|(name, members)| Group::new(name, members))
        .collect();

    Ok(Inventory::from_parts(hosts, groups)?)
}

fn read_lines(path: &Path) -> ParseResult<Vec<String>> {
    let file = File::open(path)?;
    let lines = BufReader::new(file).lines().collect::<Result<Vec<_>, _>>()?;
    Ok(lines)
}
