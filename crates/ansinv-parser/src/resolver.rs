//! Group resolution: `:children` flattening and `:vars` inheritance.
//!
//! Host records move into an arena and groups keep [`HostId`]s, so a host
//! pulled into a parent through `:children` is the same record as in its own
//! group. Variables merged through one group are visible through all of them.
//!
//! Both passes are flat and run in section order:
//! - a `:children` reference sees the referenced group as it stands at that
//!   point, so only one level of nesting is guaranteed to be complete;
//! - `:vars` sections apply first-write-wins in the order they were written,
//!   so an `[all:vars]` written before `[web:vars]` takes precedence over it.

use ansinv_core::HostId;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::builder::RawGroups;
use crate::raw::{ALL, GroupRole, RawGroup, RawRecord};
use crate::{ParseError, ParseResult};

/// A host record together with the group whose section declared it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub origin: String,
    pub record: RawRecord,
}

/// Fully resolved, still untyped inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedInventory {
    pub hosts: Vec<HostEntry>,
    /// Plain group name to members, in registration order.
    pub groups: IndexMap<String, Vec<HostId>>,
}

impl ResolvedInventory {
    pub fn entry(&self, id: HostId) -> Option<&HostEntry> {
        self.hosts.get(id.index())
    }

    /// Members of `group` in order.
    pub fn members(&self, group: &str) -> impl Iterator<Item = &HostEntry> {
        self.groups
            .get(group)
            .into_iter()
            .flatten()
            .filter_map(|id| self.entry(*id))
    }
}

/// Resolve raw sections into plain groups over a shared host arena.
pub fn resolve(groups: RawGroups) -> ParseResult<ResolvedInventory> {
    let mut resolved = ResolvedInventory::default();
    let mut children = Vec::new();
    let mut vars = Vec::new();

    for (name, group) in groups {
        match group.role() {
            GroupRole::Hosts => {
                let ids = group
                    .records
                    .into_iter()
                    .map(|record| {
                        resolved.hosts.push(HostEntry {
                            origin: name.clone(),
                            record,
                        });
                        HostId::new(resolved.hosts.len() - 1)
                    })
                    .collect();
                resolved.groups.insert(name, ids);
            }
            GroupRole::Children { parent } => children.push((parent, group)),
            GroupRole::Vars { target } => vars.push((target, group)),
            GroupRole::Unknown => {
                warn!(group = %name, line = group.line, "Ignoring section with unknown suffix");
            }
        }
    }

    for (parent, group) in &children {
        flatten_children(&mut resolved, parent, group)?;
    }

    for (target, group) in &vars {
        apply_vars(&mut resolved, target, group)?;
    }

    Ok(resolved)
}

fn flatten_children(
    resolved: &mut ResolvedInventory,
    parent: &str,
    group: &RawGroup,
) -> ParseResult<()> {
    let mut flattened = Vec::new();

    for reference in &group.records {
        let child = reference.hostname().unwrap_or_default();
        let members = resolved
            .groups
            .get(child)
            .ok_or_else(|| ParseError::MissingGroup {
                name: child.to_string(),
                referenced_by: group.name.clone(),
                line: reference.line,
            })?;
        flattened.extend_from_slice(members);
    }

    debug!(group = %parent, added = flattened.len(), "Flattened children");
    resolved
        .groups
        .entry(parent.to_string())
        .or_default()
        .extend(flattened);
    Ok(())
}

fn apply_vars(resolved: &mut ResolvedInventory, target: &str, group: &RawGroup) -> ParseResult<()> {
    let targets: Vec<HostId> = if target == ALL {
        resolved.groups.values().flatten().copied().collect()
    } else {
        resolved
            .groups
            .get(target)
            .cloned()
            .ok_or_else(|| ParseError::MissingGroup {
                name: target.to_string(),
                referenced_by: group.name.clone(),
                line: group.line,
            })?
    };

    let mut applied = 0usize;
    for record in &group.records {
        for (key, value) in &record.vars {
            for id in &targets {
                if resolved.hosts[id.index()].record.set_default(key, value) {
                    applied += 1;
                }
            }
        }
    }

    debug!(group = %target, hosts = targets.len(), applied, "Applied group vars");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_groups;

    fn resolve_text(text: &str) -> ParseResult<ResolvedInventory> {
        resolve(build_groups(text.lines())?)
    }

    fn hostnames<'a>(resolved: &'a ResolvedInventory, group: &str) -> Vec<&'a str> {
        resolved
            .members(group)
            .filter_map(|entry| entry.record.hostname())
            .collect()
    }

    #[test]
    fn test_children_concatenate_in_order() {
        let resolved = resolve_text(
            "[web]\nhost1\n\n[web:children]\napache\nnginx\n\n[apache]\ntomcat1\ntomcat2\n\n[nginx]\njenkins1\n",
        )
        .unwrap();
        assert_eq!(
            hostnames(&resolved, "web"),
            vec!["host1", "tomcat1", "tomcat2", "jenkins1"]
        );
        assert!(!resolved.groups.contains_key("web:children"));
    }

    #[test]
    fn test_children_flatten_one_level_only() {
        let resolved = resolve_text(
            "[a:children]\nb\n\n[b:children]\nc\n\n[b]\nbh\n\n[c]\nch\n\n[a]\nah\n",
        )
        .unwrap();
        assert_eq!(hostnames(&resolved, "a"), vec!["ah", "bh"]);
        assert_eq!(hostnames(&resolved, "b"), vec!["bh", "ch"]);
    }

    #[test]
    fn test_children_create_missing_parent() {
        let resolved = resolve_text("[a]\nh1\n\n[b]\nh2\n\n[ab:children]\na\nb\n").unwrap();
        let names: Vec<_> = resolved.groups.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a", "b", "ab"]);
        assert_eq!(hostnames(&resolved, "ab"), vec!["h1", "h2"]);
    }

    #[test]
    fn test_children_share_records() {
        let resolved = resolve_text("[a]\nh1\n\n[p:children]\na\n").unwrap();
        assert_eq!(resolved.groups["a"], resolved.groups["p"]);
        assert_eq!(resolved.hosts.len(), 1);
    }

    #[test]
    fn test_group_vars_do_not_override_host_vars() {
        let resolved =
            resolve_text("[g]\ntomcat1\ntomcat2 myvar=34\n\n[g:vars]\nmyvar=23\n").unwrap();
        let vars: Vec<_> = resolved
            .members("g")
            .map(|entry| entry.record.get("myvar"))
            .collect();
        assert_eq!(vars, vec![Some("23"), Some("34")]);
    }

    #[test]
    fn test_vars_reach_parent_through_alias() {
        // The children section may precede the group it references.
        let resolved =
            resolve_text("[web:children]\napache\n\n[apache]\ntomcat1\n\n[web:vars]\nport=80\n")
                .unwrap();
        let tomcat = resolved.members("apache").next().unwrap();
        assert_eq!(tomcat.record.get("port"), Some("80"));
    }

    #[test]
    fn test_dropped_host_pair_lets_group_vars_apply() {
        let resolved = resolve_text("[g]\nh1 x=a=b\n\n[g:vars]\nx=c\n").unwrap();
        let entry = resolved.members("g").next().unwrap();
        assert_eq!(entry.record.get("x"), Some("c"));
    }

    #[test]
    fn test_all_vars_written_first_wins() {
        let resolved =
            resolve_text("[g]\nh1\n\n[all:vars]\nx=global\n\n[g:vars]\nx=group\ny=group\n")
                .unwrap();
        let entry = resolved.members("g").next().unwrap();
        assert_eq!(entry.record.get("x"), Some("global"));
        assert_eq!(entry.record.get("y"), Some("group"));
    }

    #[test]
    fn test_hostname_never_inherited() {
        let resolved = resolve_text("[g]\nh1\n\n[all:vars]\nhostname=other\n").unwrap();
        assert_eq!(hostnames(&resolved, "g"), vec!["h1"]);
    }

    #[test]
    fn test_missing_child_group() {
        let result = resolve_text("[web:children]\nnope\n");
        match result {
            Err(ParseError::MissingGroup {
                name,
                referenced_by,
                line,
            }) => {
                assert_eq!(name, "nope");
                assert_eq!(referenced_by, "web:children");
                assert_eq!(line, 2);
            }
            other => panic!("expected missing group error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_vars_group() {
        let result = resolve_text("[nope:vars]\nx=1\n");
        assert!(matches!(result, Err(ParseError::MissingGroup { .. })));
    }

    #[test]
    fn test_independent_duplicate_hostnames() {
        let resolved = resolve_text("[g1]\nhost4\n\n[g2]\nhost4\n\n[g1:vars]\nonly=g1\n").unwrap();
        let g1 = resolved.members("g1").next().unwrap();
        let g2 = resolved.members("g2").next().unwrap();
        assert_eq!(g1.record.get("only"), Some("g1"));
        assert_eq!(g2.record.get("only"), None);
        assert_eq!(g2.origin, "g2");
    }

    #[test]
    fn test_unknown_suffix_ignored() {
        let resolved = resolve_text("[g]\nh1\n\n[g:weird]\nx\n").unwrap();
        let names: Vec<_> = resolved.groups.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["g"]);
    }
}
