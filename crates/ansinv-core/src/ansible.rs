//! Built-in host record carrying the common Ansible connection variables.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{Error, FieldSpec, FieldValue, HostRecord, Result};

/// Connection plugin used to reach a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Connection {
    #[display("ssh")]
    Ssh,
    #[display("local")]
    Local,
    #[display("paramiko")]
    Paramiko,
    #[display("winrm")]
    Winrm,
    #[display("docker")]
    Docker,
}

impl Connection {
    pub const VARIANTS: &'static [&'static str] = &["ssh", "local", "paramiko", "winrm", "docker"];
}

impl FromStr for Connection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ssh" => Ok(Self::Ssh),
            "local" => Ok(Self::Local),
            "paramiko" => Ok(Self::Paramiko),
            "winrm" => Ok(Self::Winrm),
            "docker" => Ok(Self::Docker),
            other => Err(Error::invalid_value(
                "ansible_connection",
                format!("unknown connection type: {}", other),
            )),
        }
    }
}

/// A host with the behavioural inventory parameters most playbooks rely on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsibleHost {
    pub hostname: String,
    pub ansible_host: Option<String>,
    pub ansible_port: Option<u16>,
    pub ansible_user: Option<String>,
    pub ansible_connection: Option<Connection>,
    pub ansible_become: Option<bool>,
    pub ansible_python_interpreter: Option<String>,
}

impl AnsibleHost {
    /// Address to connect to: `ansible_host` when set, the hostname otherwise.
    pub fn address(&self) -> &str {
        self.ansible_host.as_deref().unwrap_or(&self.hostname)
    }
}

impl HostRecord for AnsibleHost {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::string("ansible_host"),
        FieldSpec::integer("ansible_port"),
        FieldSpec::string("ansible_user"),
        FieldSpec::variant("ansible_connection", Connection::VARIANTS),
        FieldSpec::boolean("ansible_become"),
        FieldSpec::string("ansible_python_interpreter"),
    ];

    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn set_hostname(&mut self, hostname: String) {
        self.hostname = hostname;
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        match (name, value) {
            ("ansible_host", FieldValue::String(v)) => self.ansible_host = Some(v),
            ("ansible_port", FieldValue::Integer(v)) => {
                let port = u16::try_from(v).map_err(|_| {
                    Error::invalid_value(name, format!("{} is not a valid port", v))
                })?;
                self.ansible_port = Some(port);
            }
            ("ansible_user", FieldValue::String(v)) => self.ansible_user = Some(v),
            ("ansible_connection", FieldValue::Variant(v)) => {
                self.ansible_connection = Some(v.parse()?)
            }
            ("ansible_become", FieldValue::Boolean(v)) => self.ansible_become = Some(v),
            ("ansible_python_interpreter", FieldValue::String(v)) => {
                self.ansible_python_interpreter = Some(v)
            }
            (name, _) if !Self::FIELDS.iter().any(|field| field.name == name) => {
                return Err(Error::UnknownField(name.to_string()));
            }
            (name, value) => {
                return Err(Error::invalid_value(
                    name,
                    format!("unexpected {} value '{}'", value.kind_name(), value),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_fields() {
        let mut host = AnsibleHost::default();
        host.set_hostname("db1".to_string());
        host.set_field("ansible_port", FieldValue::Integer(2222)).unwrap();
        host.set_field("ansible_connection", FieldValue::Variant("winrm"))
            .unwrap();
        host.set_field("ansible_become", FieldValue::Boolean(true))
            .unwrap();

        assert_eq!(host.hostname(), "db1");
        assert_eq!(host.ansible_port, Some(2222));
        assert_eq!(host.ansible_connection, Some(Connection::Winrm));
        assert_eq!(host.ansible_become, Some(true));
        assert_eq!(host.address(), "db1");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut host = AnsibleHost::default();
        let result = host.set_field("http_port", FieldValue::Integer(80));
        assert!(matches!(result, Err(Error::UnknownField(name)) if name == "http_port"));

        let result = host.set_field("ansible_port", FieldValue::String("x".into()));
        assert!(matches!(result, Err(Error::InvalidValue { .. })));
    }

    #[test]
    fn test_port_out_of_range() {
        let mut host = AnsibleHost::default();
        let result = host.set_field("ansible_port", FieldValue::Integer(70000));
        assert!(matches!(result, Err(Error::InvalidValue { .. })));
        assert!(host.ansible_port.is_none());
    }

    #[test]
    fn test_mismatched_kind_rejected() {
        let mut host = AnsibleHost::default();
        let result = host.set_field("ansible_host", FieldValue::Integer(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_address_prefers_ansible_host() {
        let host = AnsibleHost {
            hostname: "web1".to_string(),
            ansible_host: Some("10.0.0.5".to_string()),
            ..Default::default()
        };
        assert_eq!(host.address(), "10.0.0.5");
    }

    #[test]
    fn test_connection_serializes_lowercase() {
        let json = serde_json::to_string(&Connection::Paramiko).unwrap();
        assert_eq!(json, "\"paramiko\"");
        assert_eq!("SSH".parse::<Connection>().unwrap(), Connection::Ssh);
    }
}
