//! Raw variable dump, before any typed coercion.

use ansinv_parser::{ResolvedInventory, resolve_file};
use anyhow::{Context as _, Result, anyhow};
use serde_json::{Map, Value};

use super::Context;

pub fn dump(ctx: &Context, group: Option<&str>) -> Result<()> {
    let resolved = resolve_file(&ctx.inventory)
        .with_context(|| format!("Failed to resolve inventory: {}", ctx.inventory))?;
    println!("{}", render_vars(&resolved, group, ctx.json)?);
    Ok(())
}

fn render_vars(resolved: &ResolvedInventory, group: Option<&str>, json: bool) -> Result<String> {
    // Empty groups are left out, as in the typed inventory.
    let populated = |name: &str| resolved.groups.get(name).is_some_and(|ids| !ids.is_empty());
    let names: Vec<&str> = match group {
        Some(name) if populated(name) => vec![name],
        Some(name) => return Err(anyhow!("Group not found: {}", name)),
        None => resolved
            .groups
            .keys()
            .map(String::as_str)
            .filter(|name| populated(name))
            .collect(),
    };

    if json {
        let mut groups = Map::new();
        for name in &names {
            let hosts = resolved
                .members(name)
                .map(|entry| {
                    let vars = entry
                        .record
                        .vars
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                        .collect::<Map<_, _>>();
                    Value::Object(vars)
                })
                .collect();
            groups.insert(name.to_string(), Value::Array(hosts));
        }
        return Ok(serde_json::to_string_pretty(&Value::Object(groups))?);
    }

    let mut out = Vec::new();
    for name in &names {
        out.push(format!("[{}]", name));
        for entry in resolved.members(name) {
            let vars = entry
                .record
                .vars
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(" ");
            out.push(vars);
        }
    }
    Ok(out.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ansinv_parser::resolve_lines;

    fn resolved() -> ResolvedInventory {
        resolve_lines("[web]\nweb1 port=80\n\n[web:vars]\nuser=deploy\n".lines()).unwrap()
    }

    #[test]
    fn test_render_vars_text() {
        let text = render_vars(&resolved(), None, false).unwrap();
        assert_eq!(text, "[web]\nhostname=web1 port=80 user=deploy");
    }

    #[test]
    fn test_render_vars_json() {
        let json: Value =
            serde_json::from_str(&render_vars(&resolved(), Some("web"), true).unwrap()).unwrap();
        assert_eq!(json["web"][0]["user"], "deploy");
        assert_eq!(json["web"][0]["hostname"], "web1");
    }

    #[test]
    fn test_render_vars_skips_empty_groups() {
        let resolved = resolve_lines("[empty]\n\n[web]\nweb1\n".lines()).unwrap();
        assert_eq!(render_vars(&resolved, None, false).unwrap(), "[web]\nhostname=web1");
        assert!(render_vars(&resolved, Some("empty"), false).is_err());
    }

    #[test]
    fn test_render_vars_unknown_group() {
        assert!(render_vars(&resolved(), Some("db"), false).is_err());
    }

    #[test]
    fn test_dump_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts");
        std::fs::write(&path, "[web]\nweb1\n").unwrap();

        let ctx = Context {
            inventory: path.display().to_string(),
            policy: None,
            json: false,
        };
        assert!(dump(&ctx, Some("web")).is_ok());
    }
}
