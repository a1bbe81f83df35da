use std::path::Path;

use serde::{Deserialize, Serialize};

/// Follow-up workflow state for a contact.
///
/// Exactly one state holds at a time. The date fields on [`Contact`] are
/// meaningful only under their corresponding state; stale values left over
/// from a prior state are tolerated and never read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpStatus {
    Pending,
    Done,
    Snoozed,
    #[default]
    None,
}

impl FollowUpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Snoozed => "snoozed",
            Self::None => "none",
        }
    }
}

/// A person tagged at an event.
///
/// Timestamps are stored as ISO-8601 strings and compared as parsed
/// instants, never lexically. The aggregation core does not validate them;
/// an unparseable `taggedAt` is excluded from date-bucketed series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub contact_name: String,
    /// Free-text event label. Empty folds into "Unspecified Event" at
    /// aggregation time; the stored value is passed through unchanged.
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub industry: String,
    /// Ordered free-text tags; duplicates allowed, not deduplicated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
    /// Set once at creation, never mutated.
    pub tagged_at: String,
    #[serde(default)]
    pub follow_up_status: FollowUpStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_due_date: Option<String>,
    /// Completion instant, set when status transitions to `done`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<String>,
    /// Cleared whenever status transitions away from `snoozed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snoozed_until: Option<String>,
    /// Fast-capture marker (tagged without opening the full form).
    #[serde(default)]
    pub is_quick_tag: bool,

    // Detail fields, opaque to the aggregation core. Only exports read them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A named two-sided card variant. Opaque to the aggregation core; the
/// store keeps these in a keyed mapping with last-write-wins semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_note: Option<String>,
    #[serde(default)]
    pub updated_at: String,
}

/// Configuration stored in ~/.tapdeck/config.json.
///
/// Everything is optional; a missing file means defaults. The timezone
/// defines calendar-day boundaries for analytics bucketing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Config {
    /// Load from the default location. Missing file yields defaults.
    pub fn load() -> Self {
        let path = dirs::home_dir()
            .unwrap_or_default()
            .join(".tapdeck")
            .join("config.json");
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::with_defaults(),
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("config: failed to parse {}: {}", path.display(), e);
                Self::with_defaults()
            }
        }
    }

    fn with_defaults() -> Self {
        Self {
            store_path: None,
            timezone: default_timezone(),
        }
    }

    /// Parse the configured IANA timezone, falling back to UTC.
    pub fn resolved_timezone(&self) -> chrono_tz::Tz {
        match self.timezone.parse() {
            Ok(tz) => tz,
            Err(_) => {
                log::warn!("config: unknown timezone '{}', using UTC", self.timezone);
                chrono_tz::UTC
            }
        }
    }
}
