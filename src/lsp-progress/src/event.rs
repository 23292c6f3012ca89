//! Progress events and decoding of raw `$/progress` notifications.

use crate::{ClientId, ProgressError, Result};
use lsp_types::notification::{Notification, Progress};
use lsp_types::{NumberOrString, ProgressParams, ProgressParamsValue, WorkDoneProgress};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One progress report from one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub client: ClientId,
    /// Work done token, unique within the client.
    pub token: String,
    /// `None` once the task has ended or when the server sent no percentage.
    pub percentage: Option<u32>,
}

impl ProgressEvent {
    pub fn new(client: impl Into<ClientId>, token: impl Into<String>, percentage: Option<u32>) -> Self {
        Self {
            client: client.into(),
            token: token.into(),
            percentage,
        }
    }

    /// Decode a JSON-RPC message received from `client`.
    ///
    /// Returns `Ok(None)` for anything that is not a `$/progress` notification.
    pub fn from_notification(client: ClientId, message: &Value) -> Result<Option<Self>> {
        let method = message.get("method").and_then(|m| m.as_str());
        if method != Some(Progress::METHOD) {
            return Ok(None);
        }

        let params = message.get("params").ok_or_else(|| {
            ProgressError::InvalidNotification(format!("{} without params", Progress::METHOD))
        })?;
        let params: ProgressParams = serde_json::from_value(params.clone())?;

        Ok(Some(Self::from_params(client, params)))
    }

    /// Build an event from already decoded progress params.
    pub fn from_params(client: ClientId, params: ProgressParams) -> Self {
        let token = match params.token {
            NumberOrString::Number(n) => n.to_string(),
            NumberOrString::String(s) => s,
        };

        let percentage = match params.value {
            ProgressParamsValue::WorkDone(WorkDoneProgress::Begin(begin)) => begin.percentage,
            ProgressParamsValue::WorkDone(WorkDoneProgress::Report(report)) => report.percentage,
            ProgressParamsValue::WorkDone(WorkDoneProgress::End(_)) => None,
        };

        Self {
            client,
            token,
            percentage,
        }
    }
}
