//! Follow-up urgency classification and status badges.
//!
//! Pure date-relative mappings from a contact's follow-up state to
//! presentation-ready descriptors. The clock is injected so every
//! classification is deterministic under test.

use chrono::{DateTime, Duration, Utc};

use crate::types::{Contact, FollowUpStatus};
use crate::util::{format_long_date, parse_timestamp};

const DUE_SOON_WINDOW_DAYS: i64 = 3;
const NEW_CONTACT_WINDOW_DAYS: i64 = 2;

/// Mutually exclusive urgency class, first match wins:
/// Overdue, then DueSoon, then New, then None.
///
/// A missing due date is "infinitely far": it never triggers Overdue or
/// DueSoon and falls through to the New/None checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Overdue,
    DueSoon,
    New,
    None,
}

impl Urgency {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Overdue => "Overdue",
            Self::DueSoon => "Due soon",
            Self::New => "New",
            Self::None => "",
        }
    }

    /// Severity tier for badge styling.
    pub fn severity(&self) -> &'static str {
        match self {
            Self::Overdue => "critical",
            Self::DueSoon => "warning",
            Self::New => "info",
            Self::None => "none",
        }
    }

    /// Whether a badge is shown at all.
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Classify a contact's follow-up urgency relative to `now`.
///
/// The overdue check runs regardless of `followUpStatus`; in practice it
/// only matters for pending contacts, but the precedence is part of the
/// contract and must not be reordered.
pub fn classify_urgency(contact: &Contact, now: DateTime<Utc>) -> Urgency {
    if let Some(due) = contact
        .follow_up_due_date
        .as_deref()
        .and_then(parse_timestamp)
    {
        if due < now {
            return Urgency::Overdue;
        }
        if due - now <= Duration::days(DUE_SOON_WINDOW_DAYS) {
            return Urgency::DueSoon;
        }
    }

    if let Some(tagged) = parse_timestamp(&contact.tagged_at) {
        if now - tagged <= Duration::days(NEW_CONTACT_WINDOW_DAYS) {
            return Urgency::New;
        }
    }

    Urgency::None
}

/// Display text for the four-way follow-up status badge.
pub fn follow_up_badge(contact: &Contact, now: DateTime<Utc>) -> String {
    match contact.follow_up_status {
        FollowUpStatus::Done => match contact.follow_up_date.as_deref() {
            Some(date) => format!("Done · {}", format_long_date(date)),
            None => "Completed".to_string(),
        },
        FollowUpStatus::Pending => match contact
            .follow_up_due_date
            .as_deref()
            .and_then(parse_timestamp)
        {
            Some(due) if due < now => {
                let days = (now - due).num_days();
                if days == 0 {
                    "Overdue".to_string()
                } else {
                    format!("Overdue by {} day{}", days, if days == 1 { "" } else { "s" })
                }
            }
            Some(due) => {
                let days = (due - now).num_days();
                if days == 0 {
                    "Due today".to_string()
                } else {
                    format!("Due in {} day{}", days, if days == 1 { "" } else { "s" })
                }
            }
            None => "Follow-up pending".to_string(),
        },
        FollowUpStatus::Snoozed => match contact.snoozed_until.as_deref() {
            Some(until) => format!("Until {}", format_long_date(until)),
            None => "Snoozed".to_string(),
        },
        FollowUpStatus::None => "No follow-up".to_string(),
    }
}
