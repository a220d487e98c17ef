use std::cmp::Reverse;

use serde_json::Value;

use crate::models::{ImportLog, ImportStatus, ImportTrigger, SyncStatus};
use crate::normalize::fields::{pick_f64, pick_str, pick_timestamp, pick_u64, records};

/// Import history, most recent first; rows without a parseable timestamp go last
pub fn import_logs(raw: &Value) -> Vec<ImportLog> {
    let mut logs: Vec<ImportLog> = records(raw)
        .into_iter()
        .filter(|r| r.is_object())
        .map(|r| ImportLog {
            timestamp: pick_timestamp(r, &["timestamp"]),
            timestamp_label: pick_str(r, &["timestamp"]).unwrap_or_default(),
            matches_imported: pick_u64(r, &["matches_imported"]),
            status: ImportStatus::parse(&pick_str(r, &["status"]).unwrap_or_default()),
        })
        .collect();

    // Stable: equal timestamps keep backend order
    logs.sort_by_key(|log| Reverse(log.timestamp));
    logs
}

pub fn sync_status(raw: &Value) -> SyncStatus {
    SyncStatus {
        last_import_time: pick_timestamp(raw, &["last_import_time"]),
        last_status: pick_str(raw, &["last_status"]),
        minutes_since: pick_f64(raw, &["minutes_since"]),
    }
}

pub fn import_trigger(raw: &Value) -> ImportTrigger {
    ImportTrigger {
        message: pick_str(raw, &["message"]),
        matches_imported: pick_u64(raw, &["matches_imported"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_logs_most_recent_first() {
        let logs = import_logs(&json!([
            {"timestamp": "2024-05-01T10:00:00", "matches_imported": 2, "status": "SUCCESS"},
            {"timestamp": "garbage", "matches_imported": 0, "status": "weird"},
            {"timestamp": "2024-05-03T10:00:00", "matches_imported": 5, "status": "failure"},
            {"timestamp": "2024-05-02T10:00:00", "status": "RUNNING"}
        ]));

        assert_eq!(logs[0].status, ImportStatus::Failure);
        assert_eq!(logs[1].status, ImportStatus::Running);
        assert_eq!(logs[1].matches_imported, None);
        assert_eq!(logs[2].status, ImportStatus::Success);
        assert_eq!(logs[3].status, ImportStatus::Other("weird".to_string()));
        assert_eq!(logs[3].timestamp_label, "garbage");
    }

    #[test]
    fn test_sync_status() {
        let s = sync_status(&json!({
            "last_import_time": "2024-05-01T10:00:00",
            "minutes_since": 4.5,
            "last_status": "SUCCESS"
        }));
        assert!(s.last_import_time.is_some());
        assert_eq!(s.status(), ImportStatus::Success);

        let never = sync_status(&json!({"last_import_time": null, "last_status": "no_sync_yet"}));
        assert_eq!(never.last_import_time, None);
        assert_eq!(never.last_status.as_deref(), Some("no_sync_yet"));
    }
}
