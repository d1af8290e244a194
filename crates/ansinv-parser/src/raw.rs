//! Untyped records and sections as they appear in the source.

use indexmap::IndexMap;

/// Key under which every host-line record stores its hostname.
pub const HOSTNAME_KEY: &str = "hostname";

/// Name of the implicit group collecting host lines outside any section.
pub const UNGROUPED: &str = "ungrouped";

/// Pseudo-group whose `:vars` apply to every host.
pub const ALL: &str = "all";

/// Ordered raw key/value pairs from one source line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based source line.
    pub line: usize,
    pub vars: IndexMap<String, String>,
}

impl RawRecord {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            vars: IndexMap::new(),
        }
    }

    pub fn hostname(&self) -> Option<&str> {
        self.get(HOSTNAME_KEY)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Store `value` unless `key` is already present. Returns whether it was stored.
    pub fn set_default(&mut self, key: &str, value: &str) -> bool {
        if self.vars.contains_key(key) {
            return false;
        }
        self.vars.insert(key.to_string(), value.to_string());
        true
    }
}

/// What a section name declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRole {
    /// `[name]`: host lines.
    Hosts,
    /// `[parent:children]`: references to other groups.
    Children { parent: String },
    /// `[target:vars]`: defaults for the target group, or every host for `all`.
    Vars { target: String },
    /// Any other `a:b` name; ignored during resolution.
    Unknown,
}

impl GroupRole {
    pub fn of(name: &str) -> Self {
        if !name.contains(':') {
            return Self::Hosts;
        }

        let base = name.split(':').next().unwrap_or_default().to_string();
        if name.ends_with(":children") {
            Self::Children { parent: base }
        } else if name.ends_with(":vars") {
            Self::Vars { target: base }
        } else {
            Self::Unknown
        }
    }
}

/// A section and the records listed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGroup {
    /// Name as written, suffix included.
    pub name: String,
    /// Line of the header; 0 for the implicit `ungrouped` bucket.
    pub line: usize,
    pub records: Vec<RawRecord>,
}

impl RawGroup {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
            records: Vec::new(),
        }
    }

    pub fn role(&self) -> GroupRole {
        GroupRole::of(&self.name)
    }
}

/// Split `key=value` on `=`, skipping empty parts.
///
/// Anything other than exactly two non-empty parts yields `None`, so `a==b`
/// is `("a", "b")` while `x=a=b` is dropped.
pub fn split_pair(token: &str) -> Option<(&str, &str)> {
    let mut parts = token.split('=').filter(|part| !part.is_empty());
    let (key, value) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let (key, value) = (key.trim_end(), value.trim_start());
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}
