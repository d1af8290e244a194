//! Typed group and host listings.

use ansinv_core::{AnsibleHost, Inventory};
use anyhow::{Result, anyhow};
use serde::Serialize;

use super::Context;

#[derive(Debug, Serialize)]
struct GroupSummary<'a> {
    name: &'a str,
    hosts: usize,
}

pub fn groups(ctx: &Context) -> Result<()> {
    let inventory = ctx.load()?;
    println!("{}", render_groups(&inventory, ctx.json)?);
    Ok(())
}

pub fn list(ctx: &Context, group: Option<&str>) -> Result<()> {
    let inventory = ctx.load()?;
    println!("{}", render_hosts(&inventory, group, ctx.json)?);
    Ok(())
}

pub fn show(ctx: &Context, group: &str, host: &str) -> Result<()> {
    let inventory = ctx.load()?;
    println!("{}", render_host(&inventory, group, host, ctx.json)?);
    Ok(())
}

fn render_groups(inventory: &Inventory<AnsibleHost>, json: bool) -> Result<String> {
    let summaries: Vec<_> = inventory
        .groups()
        .map(|group| GroupSummary {
            name: group.name(),
            hosts: group.len(),
        })
        .collect();

    if json {
        return Ok(serde_json::to_string_pretty(&summaries)?);
    }
    Ok(summaries
        .iter()
        .map(|s| format!("{} ({})", s.name, s.hosts))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn render_hosts(
    inventory: &Inventory<AnsibleHost>,
    group: Option<&str>,
    json: bool,
) -> Result<String> {
    let hosts: Vec<&AnsibleHost> = match group {
        Some(name) => inventory
            .group(name)
            .ok_or_else(|| anyhow!("Group not found: {}", name))?
            .hosts()
            .collect(),
        None => inventory.hosts().iter().collect(),
    };

    if json {
        return Ok(serde_json::to_string_pretty(&hosts)?);
    }
    Ok(hosts
        .iter()
        .map(|h| format!("{}\t{}", h.hostname, h.address()))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn render_host(
    inventory: &Inventory<AnsibleHost>,
    group: &str,
    hostname: &str,
    json: bool,
) -> Result<String> {
    let host = inventory
        .group(group)
        .ok_or_else(|| anyhow!("Group not found: {}", group))?
        .host(hostname)
        .ok_or_else(|| anyhow!("Host {} not found in group {}", hostname, group))?;

    if json {
        return Ok(serde_json::to_string_pretty(host)?);
    }

    let mut lines = vec![format!("hostname: {}", host.hostname)];
    let optional = [
        ("ansible_host", host.ansible_host.clone()),
        ("ansible_port", host.ansible_port.map(|p| p.to_string())),
        ("ansible_user", host.ansible_user.clone()),
        (
            "ansible_connection",
            host.ansible_connection.map(|c| c.to_string()),
        ),
        ("ansible_become", host.ansible_become.map(|b| b.to_string())),
        (
            "ansible_python_interpreter",
            host.ansible_python_interpreter.clone(),
        ),
    ];
    lines.extend(
        optional
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| format!("{}: {}", key, value))),
    );
    Ok(lines.join("\n"))
}
