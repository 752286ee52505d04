use chrono::{DateTime, Utc};
use exam_model::{ExamAssignment, SecuritySettings, ServerStatus};

/// Display status for an exam assignment, derived from the server-reported
/// status and the current time. Never stored server-side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExamStatus {
    NotStarted,
    Active,
    InProgress,
    Submitted,
    Completed,
    Overdue,
}

/// Fixed presentation tuple for a status badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusBadge {
    pub icon: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

/// Derives the display status for an assignment.
///
/// Deterministic and side-effect free: `now` is injected so callers recompute
/// on every tick instead of caching a stale status.
pub fn derive_exam_status(now: DateTime<Utc>, assignment: &ExamAssignment) -> ExamStatus {
    let exam = &assignment.exam;
    match assignment.current_status {
        ServerStatus::Submitted => {
            if now > exam.end_date || assignment.attempts_count >= exam.max_attempts {
                ExamStatus::Completed
            } else {
                ExamStatus::Submitted
            }
        }
        ServerStatus::InProgress => ExamStatus::InProgress,
        // NotStarted and anything unrecognized fall through to time rules
        ServerStatus::NotStarted | ServerStatus::Unknown => {
            if now > exam.end_date {
                ExamStatus::Overdue
            } else if now >= exam.start_date {
                ExamStatus::Active
            } else {
                ExamStatus::NotStarted
            }
        }
    }
}

impl ExamStatus {
    pub fn badge(&self) -> StatusBadge {
        match self {
            ExamStatus::NotStarted => StatusBadge {
                icon: "clock",
                label: "Not Started",
                color: "gray",
            },
            ExamStatus::Active => StatusBadge {
                icon: "play",
                label: "Active",
                color: "green",
            },
            ExamStatus::InProgress => StatusBadge {
                icon: "pencil",
                label: "In Progress",
                color: "blue",
            },
            ExamStatus::Submitted => StatusBadge {
                icon: "check",
                label: "Submitted",
                color: "teal",
            },
            ExamStatus::Completed => StatusBadge {
                icon: "check-circle",
                label: "Completed",
                color: "purple",
            },
            ExamStatus::Overdue => StatusBadge {
                icon: "alert",
                label: "Overdue",
                color: "red",
            },
        }
    }

    /// Parses a status label, falling back to `NotStarted` for anything
    /// unrecognized so a badge can always be rendered.
    pub fn from_label(label: &str) -> ExamStatus {
        match label {
            "active" => ExamStatus::Active,
            "in_progress" => ExamStatus::InProgress,
            "submitted" => ExamStatus::Submitted,
            "completed" => ExamStatus::Completed,
            "overdue" => ExamStatus::Overdue,
            _ => ExamStatus::NotStarted,
        }
    }

    /// The list-view affordance for this status, if any.
    pub fn primary_action(&self) -> Option<&'static str> {
        match self {
            ExamStatus::Active => Some("Start Exam"),
            ExamStatus::InProgress => Some("Continue Exam"),
            ExamStatus::Submitted | ExamStatus::Completed => Some("View Results"),
            ExamStatus::NotStarted | ExamStatus::Overdue => None,
        }
    }
}

/// Display labels for the security feature toggles of an exam.
pub fn security_feature_labels(settings: &SecuritySettings) -> Vec<(&'static str, String)> {
    let on_off = |enabled: bool| {
        if enabled { "Enabled" } else { "Disabled" }.to_string()
    };
    vec![
        ("Shuffle Questions", on_off(settings.shuffle_questions)),
        (
            "Tab Switch Prevention",
            match (settings.prevent_tab_switching, settings.tab_switch_limit) {
                (true, Some(limit)) => format!("Enabled (limit {limit})"),
                (true, None) => "Enabled".to_string(),
                (false, _) => "Disabled".to_string(),
            },
        ),
        ("Review After Submission", on_off(settings.allow_review)),
        ("Gaze Tracking", on_off(settings.gaze_tracking)),
    ]
}
