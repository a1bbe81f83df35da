//! Global networking analytics.
//!
//! One pure pass over the contact list produces every derived series the
//! dashboard renders: frequency tables, the cumulative growth curve, the
//! per-day activity histogram, and the insight card values. The clock and
//! the timezone that defines calendar-day boundaries are injected, so the
//! whole computation is deterministic under test.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::Serialize;

use crate::events::event_label;
use crate::types::Contact;
use crate::util::{format_month_day, parse_timestamp, timestamp_sort_key, weekday_name};

/// Spans up to this many days bucket the growth curve daily; beyond it,
/// weekly.
const DAILY_BUCKET_MAX_SPAN_DAYS: i64 = 30;
const TOP_INDUSTRIES: usize = 8;
const TOP_INTERESTS: usize = 10;
const RECENT_CONTACTS: usize = 10;
/// Active-day count below this baseline scales the consistency score down.
const CONSISTENCY_BASELINE_DAYS: usize = 30;

/// One label with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyEntry {
    pub name: String,
    pub count: usize,
}

/// One point on the cumulative growth curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPoint {
    /// Bucket key: the calendar day, or the week's start day.
    pub date: String,
    /// "Mar 5" for daily buckets, "Week 3" for weekly ones.
    pub label: String,
    /// Running cumulative total, non-decreasing across the series.
    pub count: usize,
}

/// Contacts tagged on one calendar day (non-cumulative).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPoint {
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub top_event: Option<FrequencyEntry>,
    pub top_industry: Option<FrequencyEntry>,
    pub avg_contacts_per_event: f64,
    /// Weekday name with the most tags, or "N/A" with no datable contacts.
    pub most_active_day: String,
    /// Consecutive active days counted backward from today. Counts
    /// distinct days, not contacts.
    pub networking_streak: usize,
    /// Bounded 0-100. Normalized against max(30, active days), so the
    /// score is sensitive to lifetime activity rather than a fixed
    /// calendar window.
    pub consistency_score: u32,
}

/// The full derived-statistics bundle, a pure function of the contact
/// list. Never persisted; cache by content digest if recomputation on
/// every read is unwanted (see [`crate::cache::SnapshotCache`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub event_stats: Vec<FrequencyEntry>,
    /// Truncated to the top 8 industries.
    pub industry_stats: Vec<FrequencyEntry>,
    /// Flattened over every contact's interests, truncated to the top 10.
    pub interest_stats: Vec<FrequencyEntry>,
    pub growth_data: Vec<GrowthPoint>,
    pub activity_data: Vec<ActivityPoint>,
    /// The 10 most recently tagged contacts, newest first.
    pub recent_contacts: Vec<Contact>,
    pub insights: Insights,
    pub this_month_count: usize,
    /// Rounded percentage of quick-tagged contacts.
    pub quick_tag_ratio: u32,
    pub unique_events_count: usize,
    /// Length of the truncated industry list. Deliberately preserved from
    /// the shipped behavior: with more than 8 distinct industries this
    /// undercounts the true distinct total.
    pub unique_industries_count: usize,
}

/// Compute every derived series from a point-in-time contact snapshot.
///
/// `timezone` defines the calendar-day boundaries used by day bucketing,
/// the streak walk, and the month window; `now` is the observation
/// instant. Empty input yields empty series and zeroed insights, never an
/// error.
pub fn compute_analytics(contacts: &[Contact], timezone: Tz, now: DateTime<Utc>) -> AnalyticsSnapshot {
    let today = now.with_timezone(&timezone).date_naive();
    let tag_days = local_tag_days(contacts, &timezone);

    let event_stats = frequency_table(contacts.iter().map(event_label));
    let unique_events_count = event_stats.len();

    let mut industry_stats = frequency_table(
        contacts
            .iter()
            .map(|c| c.industry.trim())
            .filter(|s| !s.is_empty()),
    );
    industry_stats.truncate(TOP_INDUSTRIES);
    let unique_industries_count = industry_stats.len();

    let mut interest_stats = frequency_table(
        contacts
            .iter()
            .flat_map(|c| c.interests.iter())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty()),
    );
    interest_stats.truncate(TOP_INTERESTS);

    let growth_data = growth_series(&tag_days, today);
    let activity_data = activity_series(&tag_days);

    let mut recent_contacts: Vec<Contact> = contacts.to_vec();
    recent_contacts.sort_by(|a, b| {
        timestamp_sort_key(&b.tagged_at).cmp(&timestamp_sort_key(&a.tagged_at))
    });
    recent_contacts.truncate(RECENT_CONTACTS);

    let insights = Insights {
        top_event: event_stats.first().cloned(),
        top_industry: industry_stats.first().cloned(),
        avg_contacts_per_event: if event_stats.is_empty() {
            0.0
        } else {
            contacts.len() as f64 / event_stats.len() as f64
        },
        most_active_day: most_active_day(&tag_days),
        networking_streak: networking_streak(&tag_days, today),
        consistency_score: consistency_score(&tag_days),
    };

    let month_start = today.with_day(1).unwrap_or(today);
    let this_month_count = tag_days.iter().filter(|d| **d >= month_start).count();

    let quick_tag_ratio = if contacts.is_empty() {
        0
    } else {
        let quick = contacts.iter().filter(|c| c.is_quick_tag).count();
        (quick as f64 / contacts.len() as f64 * 100.0).round() as u32
    };

    AnalyticsSnapshot {
        event_stats,
        industry_stats,
        interest_stats,
        growth_data,
        activity_data,
        recent_contacts,
        insights,
        this_month_count,
        quick_tag_ratio,
        unique_events_count,
        unique_industries_count,
    }
}

/// Local calendar day of every parseable `taggedAt`. Unparseable
/// timestamps are excluded from all date-bucketed series.
fn local_tag_days(contacts: &[Contact], timezone: &Tz) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(contacts.len());
    for contact in contacts {
        match parse_timestamp(&contact.tagged_at) {
            Some(instant) => days.push(instant.with_timezone(timezone).date_naive()),
            None => log::warn!(
                "analytics: unparseable taggedAt '{}' on contact {}",
                contact.tagged_at,
                contact.id
            ),
        }
    }
    days
}

/// Occurrence counts, descending. The stable sort keeps first-encounter
/// order for ties.
fn frequency_table<'a, I>(values: I) -> Vec<FrequencyEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut entries: Vec<FrequencyEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for value in values {
        match index.get(value) {
            Some(&i) => entries[i].count += 1,
            None => {
                index.insert(value.to_string(), entries.len());
                entries.push(FrequencyEntry {
                    name: value.to_string(),
                    count: 1,
                });
            }
        }
    }
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

fn growth_series(tag_days: &[NaiveDate], today: NaiveDate) -> Vec<GrowthPoint> {
    if tag_days.is_empty() {
        return Vec::new();
    }

    let mut sorted = tag_days.to_vec();
    sorted.sort_unstable();
    let earliest = sorted[0];
    let end = today.max(earliest);
    let span_days = (today - earliest).num_days();

    let mut points = Vec::new();
    let mut cumulative = 0usize;
    let mut i = 0usize;

    if span_days <= DAILY_BUCKET_MAX_SPAN_DAYS {
        let mut day = earliest;
        while day <= end {
            while i < sorted.len() && sorted[i] <= day {
                cumulative += 1;
                i += 1;
            }
            points.push(GrowthPoint {
                date: day.format("%Y-%m-%d").to_string(),
                label: format_month_day(day),
                count: cumulative,
            });
            day += Duration::days(1);
        }
    } else {
        let mut week_start = earliest;
        let mut week_number = 1u32;
        while week_start <= end {
            let week_end = week_start + Duration::days(6);
            while i < sorted.len() && sorted[i] <= week_end {
                cumulative += 1;
                i += 1;
            }
            points.push(GrowthPoint {
                date: week_start.format("%Y-%m-%d").to_string(),
                label: format!("Week {}", week_number),
                count: cumulative,
            });
            week_start += Duration::days(7);
            week_number += 1;
        }
    }

    points
}

fn activity_series(tag_days: &[NaiveDate]) -> Vec<ActivityPoint> {
    let mut counts: HashMap<NaiveDate, usize> = HashMap::new();
    for day in tag_days {
        *counts.entry(*day).or_insert(0) += 1;
    }
    let mut days: Vec<(NaiveDate, usize)> = counts.into_iter().collect();
    days.sort_unstable_by_key(|(day, _)| *day);
    days.into_iter()
        .map(|(day, count)| ActivityPoint {
            date: day.format("%Y-%m-%d").to_string(),
            count,
        })
        .collect()
}

/// Sunday-first weekday order, matching the activity histogram axis.
const SUNDAY_FIRST: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

fn most_active_day(tag_days: &[NaiveDate]) -> String {
    if tag_days.is_empty() {
        return "N/A".to_string();
    }
    let mut counts = [0usize; 7];
    for day in tag_days {
        counts[day.weekday().num_days_from_sunday() as usize] += 1;
    }
    // First-highest wins, Sunday-first.
    let mut best = 0;
    for i in 1..counts.len() {
        if counts[i] > counts[best] {
            best = i;
        }
    }
    weekday_name(SUNDAY_FIRST[best]).to_string()
}

/// Walk distinct active days backward from today. A day extends the
/// streak when it matches the anchor or is exactly one day earlier; the
/// anchor then moves to it. The first gap wider than one day ends the
/// walk. Future-dated entries are skipped rather than treated as gaps.
fn networking_streak(tag_days: &[NaiveDate], today: NaiveDate) -> usize {
    let mut active: Vec<NaiveDate> = tag_days.to_vec();
    active.sort_unstable_by(|a, b| b.cmp(a));
    active.dedup();

    let mut anchor = today;
    let mut streak = 0usize;
    for day in active {
        if day == anchor || day == anchor - Duration::days(1) {
            streak += 1;
            anchor = day;
        } else if day < anchor - Duration::days(1) {
            break;
        }
    }
    streak
}

fn consistency_score(tag_days: &[NaiveDate]) -> u32 {
    let mut distinct: Vec<NaiveDate> = tag_days.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    let active = distinct.len();
    let baseline = active.max(CONSISTENCY_BASELINE_DAYS);
    let score = (active as f64 / baseline as f64 * 100.0).round() as u32;
    score.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const TZ: Tz = chrono_tz::UTC;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> String {
        (now() - Duration::days(days)).to_rfc3339()
    }

    fn contact(event: &str, industry: &str, tagged_at: &str) -> Contact {
        Contact {
            id: uuid::Uuid::new_v4().to_string(),
            contact_name: "Someone".to_string(),
            event: event.to_string(),
            industry: industry.to_string(),
            interests: Vec::new(),
            tagged_at: tagged_at.to_string(),
            follow_up_status: Default::default(),
            follow_up_due_date: None,
            follow_up_date: None,
            snoozed_until: None,
            is_quick_tag: false,
            email: None,
            phone: None,
            company: None,
            title: None,
            notes: None,
        }
    }

    fn compute(contacts: &[Contact]) -> AnalyticsSnapshot {
        compute_analytics(contacts, TZ, now())
    }

    #[test]
    fn empty_list_yields_empty_snapshot() {
        let snap = compute(&[]);
        assert!(snap.growth_data.is_empty());
        assert!(snap.activity_data.is_empty());
        assert!(snap.event_stats.is_empty());
        assert_eq!(snap.insights.most_active_day, "N/A");
        assert_eq!(snap.insights.networking_streak, 0);
        assert_eq!(snap.insights.consistency_score, 0);
        assert_eq!(snap.insights.avg_contacts_per_event, 0.0);
        assert_eq!(snap.quick_tag_ratio, 0);
        assert_eq!(snap.this_month_count, 0);
    }

    #[test]
    fn event_stats_scenario() {
        let contacts = vec![
            contact("Conf A", "Tech", &days_ago(1)),
            contact("Conf A", "Tech", &days_ago(1)),
            contact("Conf B", "Finance", &days_ago(0)),
        ];
        let snap = compute(&contacts);
        assert_eq!(snap.event_stats.len(), 2);
        assert_eq!(snap.event_stats[0].name, "Conf A");
        assert_eq!(snap.event_stats[0].count, 2);
        assert_eq!(snap.event_stats[1].name, "Conf B");
        assert_eq!(snap.event_stats[1].count, 1);
        assert_eq!(snap.unique_events_count, 2);
        assert_eq!(snap.insights.top_event.as_ref().unwrap().name, "Conf A");
        assert!((snap.insights.avg_contacts_per_event - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn frequency_ties_keep_first_encounter_order() {
        let contacts = vec![
            contact("Alpha", "", &days_ago(2)),
            contact("Beta", "", &days_ago(1)),
        ];
        let snap = compute(&contacts);
        assert_eq!(snap.event_stats[0].name, "Alpha");
        assert_eq!(snap.event_stats[1].name, "Beta");
    }

    #[test]
    fn thirty_day_span_buckets_daily() {
        let contacts = vec![
            contact("Conf", "Tech", &days_ago(30)),
            contact("Conf", "Tech", &days_ago(0)),
        ];
        let snap = compute(&contacts);
        // One point per calendar day from start to today inclusive.
        assert_eq!(snap.growth_data.len(), 31);
        assert_eq!(snap.growth_data[0].count, 1);
        assert_eq!(snap.growth_data[0].label, "Feb 8");
        assert_eq!(snap.growth_data[30].count, 2);
        assert_eq!(snap.growth_data[30].date, "2026-03-10");
    }

    #[test]
    fn thirty_one_day_span_buckets_weekly() {
        let contacts = vec![
            contact("Conf", "Tech", &days_ago(31)),
            contact("Conf", "Tech", &days_ago(0)),
        ];
        let snap = compute(&contacts);
        // Week starts at day 0, 7, 14, 21, 28 from the earliest tag.
        assert_eq!(snap.growth_data.len(), 5);
        assert_eq!(snap.growth_data[0].label, "Week 1");
        assert_eq!(snap.growth_data[0].count, 1);
        assert_eq!(snap.growth_data[4].label, "Week 5");
        assert_eq!(snap.growth_data[4].count, 2);
    }

    #[test]
    fn growth_is_monotonic_and_ends_at_total() {
        let contacts: Vec<Contact> = [0, 3, 3, 10, 17, 24]
            .iter()
            .map(|d| contact("Conf", "Tech", &days_ago(*d)))
            .collect();
        let snap = compute(&contacts);
        for pair in snap.growth_data.windows(2) {
            assert!(pair[1].count >= pair[0].count);
        }
        assert_eq!(snap.growth_data.last().unwrap().count, contacts.len());
    }

    #[test]
    fn activity_counts_per_day_ascending() {
        let contacts = vec![
            contact("Conf", "Tech", &days_ago(1)),
            contact("Conf", "Tech", &days_ago(1)),
            contact("Conf", "Tech", &days_ago(4)),
        ];
        let snap = compute(&contacts);
        assert_eq!(snap.activity_data.len(), 2);
        assert_eq!(snap.activity_data[0].date, "2026-03-06");
        assert_eq!(snap.activity_data[0].count, 1);
        assert_eq!(snap.activity_data[1].date, "2026-03-09");
        assert_eq!(snap.activity_data[1].count, 2);
    }

    #[test]
    fn streak_counts_today_and_yesterday() {
        let contacts = vec![
            contact("Conf", "Tech", &days_ago(0)),
            contact("Conf", "Tech", &days_ago(1)),
        ];
        let snap = compute(&contacts);
        assert_eq!(snap.insights.networking_streak, 2);
    }

    #[test]
    fn streak_breaks_at_gap() {
        let contacts = vec![
            contact("Conf", "Tech", &days_ago(0)),
            contact("Conf", "Tech", &days_ago(3)),
        ];
        let snap = compute(&contacts);
        assert_eq!(snap.insights.networking_streak, 1);
    }

    #[test]
    fn streak_starting_yesterday_still_counts() {
        let contacts = vec![
            contact("Conf", "Tech", &days_ago(1)),
            contact("Conf", "Tech", &days_ago(2)),
        ];
        let snap = compute(&contacts);
        assert_eq!(snap.insights.networking_streak, 2);
    }

    #[test]
    fn streak_counts_days_not_contacts() {
        let contacts = vec![
            contact("Conf", "Tech", &days_ago(0)),
            contact("Conf", "Tech", &days_ago(0)),
            contact("Conf", "Tech", &days_ago(0)),
        ];
        let snap = compute(&contacts);
        assert_eq!(snap.insights.networking_streak, 1);
    }

    #[test]
    fn most_active_day_picks_highest_tally() {
        // 2026-03-10 is a Tuesday; 2026-03-09 a Monday.
        let contacts = vec![
            contact("Conf", "Tech", &days_ago(0)),
            contact("Conf", "Tech", &days_ago(7)),
            contact("Conf", "Tech", &days_ago(1)),
        ];
        let snap = compute(&contacts);
        assert_eq!(snap.insights.most_active_day, "Tuesday");
    }

    #[test]
    fn consistency_score_scales_below_thirty_active_days() {
        let contacts: Vec<Contact> = (0..3)
            .map(|d| contact("Conf", "Tech", &days_ago(d)))
            .collect();
        let snap = compute(&contacts);
        // 3 active days against the 30-day baseline.
        assert_eq!(snap.insights.consistency_score, 10);
    }

    #[test]
    fn consistency_score_saturates_at_hundred() {
        let contacts: Vec<Contact> = (0..45)
            .map(|d| contact("Conf", "Tech", &days_ago(d)))
            .collect();
        let snap = compute(&contacts);
        assert_eq!(snap.insights.consistency_score, 100);
    }

    #[test]
    fn industry_list_truncates_and_count_reflects_truncation() {
        let contacts: Vec<Contact> = (0..10)
            .map(|i| contact("Conf", &format!("Industry {}", i), &days_ago(0)))
            .collect();
        let snap = compute(&contacts);
        assert_eq!(snap.industry_stats.len(), 8);
        // Shipped behavior: the count tracks the truncated list, not the
        // true distinct total.
        assert_eq!(snap.unique_industries_count, 8);
        assert_eq!(snap.unique_events_count, 1);
    }

    #[test]
    fn interest_stats_flatten_and_cap_at_ten() {
        let mut a = contact("Conf", "Tech", &days_ago(0));
        a.interests = (0..8).map(|i| format!("topic-{}", i)).collect();
        a.interests.push("rust".to_string());
        let mut b = contact("Conf", "Tech", &days_ago(1));
        b.interests = vec!["rust".to_string(), "wasm".to_string(), "embedded".to_string()];

        let snap = compute(&[a, b]);
        assert_eq!(snap.interest_stats.len(), 10);
        assert_eq!(snap.interest_stats[0].name, "rust");
        assert_eq!(snap.interest_stats[0].count, 2);
    }

    #[test]
    fn this_month_counts_from_first_of_month() {
        let contacts = vec![
            contact("Conf", "Tech", "2026-03-01T00:00:00Z"),
            contact("Conf", "Tech", "2026-03-05T10:00:00Z"),
            contact("Conf", "Tech", "2026-02-28T23:59:59Z"),
        ];
        let snap = compute(&contacts);
        assert_eq!(snap.this_month_count, 2);
    }

    #[test]
    fn quick_tag_ratio_rounds() {
        let mut contacts = vec![
            contact("Conf", "Tech", &days_ago(0)),
            contact("Conf", "Tech", &days_ago(0)),
            contact("Conf", "Tech", &days_ago(0)),
        ];
        contacts[0].is_quick_tag = true;
        let snap = compute(&contacts);
        assert_eq!(snap.quick_tag_ratio, 33);
    }

    #[test]
    fn recent_contacts_caps_at_ten_newest_first() {
        let contacts: Vec<Contact> = (0..12)
            .map(|d| contact("Conf", "Tech", &days_ago(d)))
            .collect();
        let snap = compute(&contacts);
        assert_eq!(snap.recent_contacts.len(), 10);
        assert_eq!(snap.recent_contacts[0].tagged_at, days_ago(0));
        assert_eq!(snap.recent_contacts[9].tagged_at, days_ago(9));
    }

    #[test]
    fn timezone_shifts_day_boundaries() {
        // 03:00 UTC on Mar 10 is still Mar 9 in New York.
        let contacts = vec![contact("Conf", "Tech", "2026-03-10T03:00:00Z")];
        let snap = compute_analytics(&contacts, chrono_tz::America::New_York, now());
        assert_eq!(snap.activity_data[0].date, "2026-03-09");
    }

    #[test]
    fn unparseable_tags_are_excluded_from_series() {
        let contacts = vec![
            contact("Conf", "Tech", "not a date"),
            contact("Conf", "Tech", &days_ago(0)),
        ];
        let snap = compute(&contacts);
        // Still counted in frequency tables, excluded from date buckets.
        assert_eq!(snap.event_stats[0].count, 2);
        assert_eq!(snap.growth_data.last().unwrap().count, 1);
        assert_eq!(snap.activity_data.len(), 1);
    }

    #[test]
    fn recompute_is_idempotent() {
        let contacts = vec![
            contact("Conf A", "Tech", &days_ago(2)),
            contact("Conf B", "Finance", &days_ago(0)),
        ];
        assert_eq!(compute(&contacts), compute(&contacts));
    }
}
