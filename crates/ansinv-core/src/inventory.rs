//! Typed inventory: a host arena shared by ordered groups.
//!
//! A host reached through several groups (for example via `:children`) is
//! stored once; every group that contains it holds the same [`HostId`].

use derive_more::Display;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::{Error, HostRecord, Result};

/// Index of a host record in its inventory's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("#{_0}")]
pub struct HostId(usize);

impl HostId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A named, ordered list of member hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: String,
    members: Vec<HostId>,
}

impl Group {
    pub fn new(name: impl Into<String>, members: Vec<HostId>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Parsed inventory of typed hosts.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory<T> {
    hosts: Vec<T>,
    groups: Vec<Group>,
}

impl<T: HostRecord> Inventory<T> {
    /// Assemble an inventory, checking that every member id is in the arena.
    pub fn from_parts(hosts: Vec<T>, groups: Vec<Group>) -> Result<Self> {
        for group in &groups {
            if let Some(id) = group.members.iter().find(|id| id.index() >= hosts.len()) {
                return Err(Error::DanglingHost {
                    group: group.name.clone(),
                    id: id.to_string(),
                });
            }
        }
        Ok(Self { hosts, groups })
    }

    /// First group named `name`.
    pub fn group(&self, name: &str) -> Option<GroupView<'_, T>> {
        self.groups().find(|group| group.name() == name)
    }

    /// Groups in inventory order.
    pub fn groups(&self) -> impl Iterator<Item = GroupView<'_, T>> {
        self.groups.iter().map(move |group| GroupView {
            inventory: self,
            group,
        })
    }

    /// Every group listing a host named `hostname`.
    pub fn groups_of<'a>(&'a self, hostname: &'a str) -> impl Iterator<Item = GroupView<'a, T>> {
        self.groups()
            .filter(move |group| group.host(hostname).is_some())
    }

    pub fn host(&self, id: HostId) -> Option<&T> {
        self.hosts.get(id.index())
    }

    /// Distinct host records, including hosts shared between groups once.
    pub fn hosts(&self) -> &[T] {
        &self.hosts
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Borrowed view of one group, resolving member ids against the arena.
pub struct GroupView<'a, T> {
    inventory: &'a Inventory<T>,
    group: &'a Group,
}

impl<T> Clone for GroupView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for GroupView<'_, T> {}

impl<'a, T: HostRecord> GroupView<'a, T> {
    pub fn name(&self) -> &'a str {
        &self.group.name
    }

    /// Members in group order; a host listed twice is yielded twice.
    pub fn hosts(&self) -> impl Iterator<Item = &'a T> + use<'a, T> {
        let inventory = self.inventory;
        self.group
            .members
            .iter()
            .filter_map(move |id| inventory.host(*id))
    }

    /// First member named `hostname`.
    pub fn host(&self, hostname: &str) -> Option<&'a T> {
        self.hosts().find(|host| host.hostname() == hostname)
    }

    pub fn len(&self) -> usize {
        self.group.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.group.members.is_empty()
    }
}

impl<T: HostRecord + std::fmt::Debug> std::fmt::Debug for GroupView<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupView")
            .field("name", &self.name())
            .field("hosts", &self.hosts().collect::<Vec<_>>())
            .finish()
    }
}

impl<T: HostRecord + Serialize> Serialize for GroupView<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for host in self.hosts() {
            seq.serialize_element(host)?;
        }
        seq.end()
    }
}

/// Serialized as an ordered map of group name to member hosts.
impl<T: HostRecord + Serialize> Serialize for Inventory<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for group in self.groups() {
            map.serialize_entry(group.name(), &group)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnsibleHost;

    fn host(name: &str) -> AnsibleHost {
        AnsibleHost {
            hostname: name.to_string(),
            ..Default::default()
        }
    }

    fn sample() -> Inventory<AnsibleHost> {
        let hosts = vec![host("tomcat1"), host("jenkins1"), host("tomcat1")];
        let groups = vec![
            Group::new("apache", vec![HostId::new(0)]),
            Group::new("nginx", vec![HostId::new(1)]),
            Group::new("web", vec![HostId::new(0), HostId::new(1)]),
            Group::new("other", vec![HostId::new(2)]),
        ];
        Inventory::from_parts(hosts, groups).unwrap()
    }

    #[test]
    fn test_group_lookup() {
        let inventory = sample();
        assert_eq!(inventory.len(), 4);
        let web = inventory.group("web").unwrap();
        assert_eq!(web.len(), 2);
        assert_eq!(web.host("jenkins1").unwrap().hostname, "jenkins1");
        assert!(web.host("missing").is_none());
        assert!(inventory.group("missing").is_none());
    }

    #[test]
    fn test_shared_members_resolve_to_same_record() {
        let inventory = sample();
        let apache = inventory.group("apache").unwrap();
        let web = inventory.group("web").unwrap();
        assert!(std::ptr::eq(
            apache.host("tomcat1").unwrap(),
            web.host("tomcat1").unwrap()
        ));
        assert!(!std::ptr::eq(
            apache.host("tomcat1").unwrap(),
            inventory.group("other").unwrap().host("tomcat1").unwrap()
        ));
    }

    #[test]
    fn test_groups_of() {
        let inventory = sample();
        let names: Vec<_> = inventory.groups_of("tomcat1").map(|g| g.name()).collect();
        assert_eq!(names, vec!["apache", "web", "other"]);
    }

    #[test]
    fn test_dangling_member_rejected() {
        let result = Inventory::from_parts(
            vec![host("a")],
            vec![Group::new("g", vec![HostId::new(3)])],
        );
        assert!(matches!(result, Err(Error::DanglingHost { .. })));
    }

    #[test]
    fn test_serialize_as_group_map() {
        let inventory = sample();
        let value = serde_json::to_value(&inventory).unwrap();
        assert_eq!(value["web"][1]["hostname"], "jenkins1");
        assert_eq!(value["apache"].as_array().unwrap().len(), 1);
    }
}
