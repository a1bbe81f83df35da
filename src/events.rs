use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{Contact, FollowUpStatus};
use crate::util::parse_timestamp;

/// Group key for contacts with an empty or missing event label.
pub const UNSPECIFIED_EVENT: &str = "Unspecified Event";

/// Four-way follow-up tally for an event group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpTally {
    pub pending: usize,
    pub done: usize,
    pub snoozed: usize,
    pub none: usize,
}

impl FollowUpTally {
    fn record(&mut self, status: FollowUpStatus) {
        match status {
            FollowUpStatus::Pending => self.pending += 1,
            FollowUpStatus::Done => self.done += 1,
            FollowUpStatus::Snoozed => self.snoozed += 1,
            FollowUpStatus::None => self.none += 1,
        }
    }
}

/// Per-event rollup, recomputed from the contact list on every read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAggregate {
    pub name: String,
    pub contact_count: usize,
    pub follow_up_stats: FollowUpTally,
    /// Percentage of completed follow-ups among contacts that have any
    /// follow-up activity. 0 when no contact in the group has one.
    pub completion_rate: f64,
    /// Chronological max of the group's `taggedAt` values. `None` only
    /// when every timestamp in the group is unparseable.
    pub most_recent_date: Option<DateTime<Utc>>,
    pub contacts: Vec<Contact>,
}

impl EventAggregate {
    /// Whether any contact in this group has follow-up activity.
    pub fn has_follow_ups(&self) -> bool {
        self.contact_count - self.follow_up_stats.none > 0
    }
}

pub(crate) fn event_label(contact: &Contact) -> &str {
    if contact.event.trim().is_empty() {
        UNSPECIFIED_EVENT
    } else {
        &contact.event
    }
}

/// Group contacts by event, sorted descending by most-recent tag date.
///
/// Empty input yields empty output. Timestamps are compared as parsed
/// instants, not as strings.
pub fn aggregate_events(contacts: &[Contact]) -> Vec<EventAggregate> {
    let mut groups: Vec<EventAggregate> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for contact in contacts {
        let name = event_label(contact);
        let idx = match index.get(name) {
            Some(&i) => i,
            None => {
                groups.push(EventAggregate {
                    name: name.to_string(),
                    contact_count: 0,
                    follow_up_stats: FollowUpTally::default(),
                    completion_rate: 0.0,
                    most_recent_date: None,
                    contacts: Vec::new(),
                });
                index.insert(name.to_string(), groups.len() - 1);
                groups.len() - 1
            }
        };

        let group = &mut groups[idx];
        group.contact_count += 1;
        group.follow_up_stats.record(contact.follow_up_status);
        if let Some(tagged) = parse_timestamp(&contact.tagged_at) {
            if group.most_recent_date.map(|d| tagged > d).unwrap_or(true) {
                group.most_recent_date = Some(tagged);
            }
        }
        group.contacts.push(contact.clone());
    }

    for group in &mut groups {
        let with_follow_up = group.contact_count - group.follow_up_stats.none;
        group.completion_rate = if with_follow_up == 0 {
            0.0
        } else {
            group.follow_up_stats.done as f64 / with_follow_up as f64 * 100.0
        };
    }

    // Stable sort keeps first-encounter order for groups with equal dates;
    // groups with no parseable date sink to the end.
    groups.sort_by(|a, b| {
        b.most_recent_date
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
            .cmp(&a.most_recent_date.unwrap_or(DateTime::<Utc>::MIN_UTC))
    });
    groups
}
