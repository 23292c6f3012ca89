//! Input records: one JSON object per line.
//!
//! ```json
//! {"client": 1, "name": "rust-analyzer", "message": {"jsonrpc": "2.0", "method": "$/progress", ...}}
//! ```

use lsp_progress::{ClientId, ClientInfo};
use serde::Deserialize;
use serde_json::Value;

/// One JSON-RPC message received from one language server.
#[derive(Debug, Clone, Deserialize)]
pub struct InputRecord {
    pub client: ClientId,
    /// Display name; the client id is used when missing.
    #[serde(default)]
    pub name: Option<String>,
    pub message: Value,
}

impl InputRecord {
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    pub fn client_info(&self) -> ClientInfo {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| self.client.to_string());
        ClientInfo::new(self.client.clone(), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_name() {
        let record = InputRecord::parse(
            r#"{"client": 1, "name": "rust-analyzer", "message": {"jsonrpc": "2.0", "method": "$/progress"}}"#,
        )
        .unwrap();

        assert_eq!(record.client, ClientId::from(1u64));
        assert_eq!(record.client_info(), ClientInfo::new(1u64, "rust-analyzer"));
        assert_eq!(record.message["method"], "$/progress");
    }

    #[test]
    fn test_name_defaults_to_client_id() {
        let record = InputRecord::parse(r#"{"client": "gopls", "message": {}}"#).unwrap();
        assert_eq!(record.client_info(), ClientInfo::new("gopls", "gopls"));
    }

    #[test]
    fn test_missing_message_is_rejected() {
        assert!(InputRecord::parse(r#"{"client": 1}"#).is_err());
        assert!(InputRecord::parse("not json").is_err());
    }
}
