//! Language server client identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of one running language server instance.
///
/// Stable only for the lifetime of the current process. Hosts may use
/// whatever they already have: a numeric client id or a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClientId {
    Number(u64),
    Name(String),
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<u64> for ClientId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for ClientId {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ClientId {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// A client as the status line sees it: identifier plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub id: ClientId,
    /// Display name (e.g., "rust-analyzer", "gopls").
    pub name: String,
}

impl ClientInfo {
    pub fn new(id: impl Into<ClientId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_deserializes_number_or_string() {
        let number: ClientId = serde_json::from_str("3").unwrap();
        assert_eq!(number, ClientId::Number(3));

        let name: ClientId = serde_json::from_str("\"tsserver\"").unwrap();
        assert_eq!(name, ClientId::from("tsserver"));
    }

    #[test]
    fn test_client_id_display() {
        assert_eq!(ClientId::from(7u64).to_string(), "7");
        assert_eq!(ClientId::from("gopls").to_string(), "gopls");
    }
}
