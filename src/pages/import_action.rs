use std::time::{Duration, Instant};

use crate::models::ImportStatus;
use crate::workers::ImportEvent;

/// How long a non-loading toast stays up
pub const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq)]
pub enum ImportPhase {
    Idle,
    /// Trigger request in flight
    Starting,
    /// Accepted by the backend; waiting for the job to settle
    Running,
    Completed(ImportStatus),
    /// Gave up waiting without a terminal status
    StillRunning,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Loading,
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub raised_at: Instant,
}

impl Toast {
    fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            raised_at: Instant::now(),
        }
    }
}

/// The manual import button: phase plus the toast it raises
#[derive(Debug, Clone)]
pub struct ImportAction {
    phase: ImportPhase,
    toast: Option<Toast>,
}

impl ImportAction {
    pub fn new() -> Self {
        Self {
            phase: ImportPhase::Idle,
            toast: None,
        }
    }

    pub fn phase(&self) -> &ImportPhase {
        &self.phase
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, ImportPhase::Starting | ImportPhase::Running)
    }

    /// Start an import. Returns false (and changes nothing) while one is
    /// already in flight.
    pub fn begin(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.phase = ImportPhase::Starting;
        self.toast = Some(Toast::new(ToastKind::Loading, "Starting import..."));
        true
    }

    /// Advance on a watcher event. Returns true when the import settled and
    /// the sync sections should be reloaded.
    pub fn on_event(&mut self, event: &ImportEvent) -> bool {
        match event {
            ImportEvent::Triggered(Ok(trigger)) => {
                self.phase = ImportPhase::Running;
                let message = match trigger.matches_imported {
                    Some(n) => format!("Import started ({} matches)", n),
                    None => "Import started".to_string(),
                };
                self.toast = Some(Toast::new(ToastKind::Success, message));
                false
            }
            ImportEvent::Triggered(Err(reason)) => {
                self.phase = ImportPhase::Failed(reason.clone());
                self.toast = Some(Toast::new(
                    ToastKind::Error,
                    format!("Import failed: {}", reason),
                ));
                false
            }
            ImportEvent::Progress(_) => false,
            ImportEvent::Finished(sync) => {
                let status = sync.status();
                let kind = match status {
                    ImportStatus::Failure => ToastKind::Error,
                    _ => ToastKind::Info,
                };
                self.toast = Some(Toast::new(
                    kind,
                    format!("Import finished: {}", status.label()),
                ));
                self.phase = ImportPhase::Completed(status);
                true
            }
            ImportEvent::TimedOut(_) => {
                self.phase = ImportPhase::StillRunning;
                self.toast = Some(Toast::new(ToastKind::Info, "Import still running"));
                true
            }
        }
    }

    /// Drop a finished toast once it has been shown long enough
    pub fn expire_toast(&mut self, now: Instant, ttl: Duration) {
        let expired = self.toast.as_ref().is_some_and(|toast| {
            toast.kind != ToastKind::Loading && now.duration_since(toast.raised_at) >= ttl
        });
        if expired {
            self.toast = None;
        }
    }

    /// One-word state for the import button
    pub fn button_label(&self) -> &'static str {
        match self.phase {
            ImportPhase::Starting | ImportPhase::Running => "importing...",
            _ => "import",
        }
    }
}

impl Default for ImportAction {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImportTrigger, SyncStatus};

    fn finished(status: &str) -> ImportEvent {
        ImportEvent::Finished(SyncStatus {
            last_status: Some(status.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_toast_sequence() {
        let mut action = ImportAction::new();
        assert!(action.begin());
        assert_eq!(action.toast().unwrap().kind, ToastKind::Loading);
        assert_eq!(action.button_label(), "importing...");

        let done = action.on_event(&ImportEvent::Triggered(Ok(ImportTrigger {
            message: None,
            matches_imported: Some(5),
        })));
        assert!(!done);
        assert_eq!(action.toast().unwrap().kind, ToastKind::Success);
        assert_eq!(action.toast().unwrap().message, "Import started (5 matches)");
        assert!(action.is_busy());

        assert!(action.on_event(&finished("SUCCESS")));
        assert_eq!(action.phase(), &ImportPhase::Completed(ImportStatus::Success));
        assert!(!action.is_busy());
    }

    #[test]
    fn test_repeat_trigger_ignored_while_busy() {
        let mut action = ImportAction::new();
        assert!(action.begin());
        assert!(!action.begin());
        action.on_event(&ImportEvent::Triggered(Err("server unreachable".into())));
        assert_eq!(action.toast().unwrap().kind, ToastKind::Error);
        assert_eq!(action.toast().unwrap().message, "Import failed: server unreachable");
        assert!(action.begin());
    }

    #[test]
    fn test_failure_and_timeout() {
        let mut action = ImportAction::new();
        action.begin();
        action.on_event(&finished("FAILURE"));
        assert_eq!(action.toast().unwrap().kind, ToastKind::Error);

        action.begin();
        assert!(action.on_event(&ImportEvent::TimedOut(None)));
        assert_eq!(action.phase(), &ImportPhase::StillRunning);
    }

    #[test]
    fn test_toast_expiry_spares_loading() {
        let mut action = ImportAction::new();
        action.begin();
        let later = Instant::now() + Duration::from_secs(60);
        action.expire_toast(later, TOAST_TTL);
        assert!(action.toast().is_some());

        action.on_event(&ImportEvent::TimedOut(None));
        action.expire_toast(later, TOAST_TTL);
        assert!(action.toast().is_none());
    }
}
