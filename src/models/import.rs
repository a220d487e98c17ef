use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One run of the backend import job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportLog {
    pub timestamp: Option<NaiveDateTime>,
    /// Raw timestamp, kept for display when it does not parse
    pub timestamp_label: String,
    pub matches_imported: Option<u64>,
    pub status: ImportStatus,
}

/// Import job status; unknown values are kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportStatus {
    Success,
    Failure,
    Running,
    Other(String),
}

impl ImportStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "SUCCESS" => ImportStatus::Success,
            "FAILURE" | "FAILED" | "ERROR" => ImportStatus::Failure,
            "RUNNING" => ImportStatus::Running,
            _ => ImportStatus::Other(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ImportStatus::Success => "SUCCESS",
            ImportStatus::Failure => "FAILURE",
            ImportStatus::Running => "RUNNING",
            ImportStatus::Other(s) if s.is_empty() => "N/A",
            ImportStatus::Other(s) => s,
        }
    }

    /// Whether the job has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportStatus::Success | ImportStatus::Failure)
    }
}

/// Last synchronisation as reported by the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SyncStatus {
    pub last_import_time: Option<NaiveDateTime>,
    pub last_status: Option<String>,
    pub minutes_since: Option<f64>,
}

impl SyncStatus {
    pub fn status(&self) -> ImportStatus {
        ImportStatus::parse(self.last_status.as_deref().unwrap_or(""))
    }
}

/// Response to a manual import trigger
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImportTrigger {
    pub message: Option<String>,
    pub matches_imported: Option<u64>,
}
