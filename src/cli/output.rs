use crate::cli::error::WagtailError;

use serde::Serialize;


#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Error,
}

/// Envelope printed on stdout when `--json` is set.
#[derive(Debug, Serialize)]
pub struct CommandOutput {
    pub command: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandOutput {
    pub fn success(command: &str, data: serde_json::Value) -> Self {
        CommandOutput {
            command: command.to_string(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(command: &str, error: &WagtailError) -> Self {
        CommandOutput {
            command: command.to_string(),
            status: Status::Error,
            data: None,
            error: Some(error.to_string()),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.status {
            Status::Success => 0,
            Status::Error => 1,
        }
    }
}
