//! Single-pass classification of cleaned lines into raw sections.

use indexmap::IndexMap;
use tracing::debug;

use crate::line::{CleanLine, clean_line};
use crate::raw::{HOSTNAME_KEY, RawGroup, RawRecord, UNGROUPED, split_pair};
use crate::{ParseError, ParseResult};

/// Sections in registration order, keyed by their raw name.
pub type RawGroups = IndexMap<String, RawGroup>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Hosts,
    Vars,
    Children,
}

/// Stateful builder fed one line at a time.
///
/// A genuinely blank line ends the current section: following host lines go
/// to the `ungrouped` bucket. Lines that are blank only because a comment was
/// removed leave the section open.
#[derive(Debug, Default)]
pub struct GroupBuilder {
    groups: RawGroups,
    ungrouped: Vec<RawRecord>,
    current: Option<String>,
}

impl GroupBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the 1-based line `number`.
    pub fn push_line(&mut self, number: usize, raw: &str) -> ParseResult<()> {
        let line = clean_line(raw);

        if line.is_empty() {
            if !line.was_comment {
                self.current = None;
            }
            return Ok(());
        }

        if let Some(name) = header_name(&line.text) {
            return self.open_section(name, number);
        }

        let context = match self.current.as_deref() {
            Some(name) if name.ends_with(":vars") => Context::Vars,
            Some(name) if name.ends_with(":children") => Context::Children,
            _ => Context::Hosts,
        };

        let record = match context {
            Context::Vars => match vars_record(&line, number) {
                Some(record) => record,
                None => {
                    debug!(line = number, text = %line.text, "Ignoring malformed vars line");
                    return Ok(());
                }
            },
            Context::Children => {
                let mut record = RawRecord::new(number);
                record.vars.insert(HOSTNAME_KEY.to_string(), line.text.clone());
                record
            }
            Context::Hosts => host_record(&line, number),
        };

        self.target().push(record);
        Ok(())
    }

    /// Finish the pass, registering `ungrouped` when it has hosts.
    pub fn finish(mut self) -> RawGroups {
        if !self.ungrouped.is_empty() {
            let bucket = std::mem::take(&mut self.ungrouped);
            debug!(hosts = bucket.len(), "Registering ungrouped hosts");
            self.groups
                .entry(UNGROUPED.to_string())
                .or_insert_with(|| RawGroup::new(UNGROUPED, 0))
                .records
                .extend(bucket);
        }
        self.groups
    }

    fn open_section(&mut self, name: &str, number: usize) -> ParseResult<()> {
        if self.groups.contains_key(name) {
            return Err(ParseError::DuplicateGroup {
                name: name.to_string(),
                line: number,
            });
        }

        debug!(group = %name, line = number, "Section");
        self.groups.insert(name.to_string(), RawGroup::new(name, number));
        self.current = Some(name.to_string());
        Ok(())
    }

    fn target(&mut self) -> &mut Vec<RawRecord> {
        match self
            .current
            .as_ref()
            .and_then(|name| self.groups.get_mut(name))
        {
            Some(group) => &mut group.records,
            None => &mut self.ungrouped,
        }
    }
}

/// Classify every line and return the raw sections.
pub fn build_groups<I, S>(lines: I) -> ParseResult<RawGroups>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = GroupBuilder::new();
    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        let line = match index {
            0 => line.strip_prefix('\u{feff}').unwrap_or(line),
            _ => line,
        };
        builder.push_line(index + 1, line)?;
    }
    Ok(builder.finish())
}

fn header_name(text: &str) -> Option<&str> {
    text.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

fn vars_record(line: &CleanLine, number: usize) -> Option<RawRecord> {
    let (key, value) = split_pair(&line.text)?;
    let mut record = RawRecord::new(number);
    record.vars.insert(key.to_string(), value.to_string());
    Some(record)
}

fn host_record(line: &CleanLine, number: usize) -> RawRecord {
    let tokens = line.tokens();
    let mut record = RawRecord::new(number);

    let Some((hostname, pairs)) = tokens.split_first() else {
        return record;
    };
    record
        .vars
        .insert(HOSTNAME_KEY.to_string(), hostname.to_string());

    for token in pairs {
        match split_pair(token) {
            Some((key, value)) => {
                if !record.set_default(key, value) {
                    debug!(line = number, key, "Ignoring repeated host variable");
                }
            }
            None => debug!(line = number, token, "Ignoring token without key=value"),
        }
    }
    record
}
