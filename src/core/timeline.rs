// RPTO Leads - core/timeline.rs
//
// Date grouping of leads into the four display buckets, and the
// human-readable timestamp formatter.
//
// The reference instant is always passed in. Its time zone defines the
// calendar used for the Today/Yesterday checks, so callers pass
// `Local::now()` at the outermost boundary and fixed instants in tests.

use crate::core::model::Lead;
use crate::util::constants::{DISPLAY_DATE_FORMAT, RECENT_WINDOW_DAYS};
use chrono::{DateTime, Days, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt;

/// Display bucket, in fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeBucket {
    Today,
    Yesterday,
    Last7Days,
    Older,
}

impl TimeBucket {
    /// Returns all variants in display order.
    pub fn all() -> &'static [TimeBucket] {
        &[
            TimeBucket::Today,
            TimeBucket::Yesterday,
            TimeBucket::Last7Days,
            TimeBucket::Older,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeBucket::Today => "Today",
            TimeBucket::Yesterday => "Yesterday",
            TimeBucket::Last7Days => "Last 7 Days",
            TimeBucket::Older => "Older",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse a stored `created_at` value.
///
/// Accepts RFC 3339 timestamps, ISO date-times without an offset and bare
/// `YYYY-MM-DD` dates. Values without an offset are taken as UTC, the zone
/// the store writes in. Anything else yields `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive).into());
        }
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).into())
}

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Assign a timestamp to exactly one bucket relative to `now`.
///
/// Precedence: Today, Yesterday, Last 7 Days (strictly newer than the same
/// wall-clock time 7 calendar days before `now`), Older. Unparseable
/// timestamps are Older.
pub fn classify<Tz: TimeZone>(created_at: &str, now: &DateTime<Tz>) -> TimeBucket {
    let Some(ts) = parse_timestamp(created_at) else {
        return TimeBucket::Older;
    };

    let day = ts.with_timezone(&now.timezone()).date_naive();
    let today = now.date_naive();
    if day == today {
        return TimeBucket::Today;
    }
    if Some(day) == today.pred_opt() {
        return TimeBucket::Yesterday;
    }

    let cutoff = days_before(now, RECENT_WINDOW_DAYS);
    if ts.with_timezone(&Utc) > cutoff.with_timezone(&Utc) {
        TimeBucket::Last7Days
    } else {
        TimeBucket::Older
    }
}

/// `now` moved back by whole calendar days in its own zone, so a daylight
/// saving change inside the window does not shift the cutoff. Falls back to
/// a fixed span when that wall-clock time does not exist.
fn days_before<Tz: TimeZone>(now: &DateTime<Tz>, days: u64) -> DateTime<Tz> {
    now.naive_local()
        .checked_sub_days(Days::new(days))
        .and_then(|local| now.timezone().from_local_datetime(&local).earliest())
        .unwrap_or_else(|| now.clone() - Duration::days(days as i64))
}

/// Leads partitioned by bucket. Input order is preserved within each bucket.
///
/// Empty buckets are kept; hiding them is up to the renderer.
#[derive(Debug, Clone, Default)]
pub struct GroupedLeads<'a> {
    buckets: [Vec<&'a Lead>; 4],
}

impl<'a> GroupedLeads<'a> {
    pub fn get(&self, bucket: TimeBucket) -> &[&'a Lead] {
        &self.buckets[bucket.index()]
    }

    /// Buckets in display order, including empty ones.
    pub fn iter<'s>(&'s self) -> impl Iterator<Item = (TimeBucket, &'s [&'a Lead])> + 's {
        TimeBucket::all()
            .iter()
            .map(move |&b| (b, self.get(b)))
    }

    /// Total number of leads across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Group leads into the four buckets relative to `now`.
pub fn group_by_date<'a, Tz, I>(leads: I, now: &DateTime<Tz>) -> GroupedLeads<'a>
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a Lead>,
{
    let mut grouped = GroupedLeads::default();
    for lead in leads {
        let bucket = classify(&lead.created_at, now);
        grouped.buckets[bucket.index()].push(lead);
    }
    tracing::debug!(
        today = grouped.get(TimeBucket::Today).len(),
        yesterday = grouped.get(TimeBucket::Yesterday).len(),
        recent = grouped.get(TimeBucket::Last7Days).len(),
        older = grouped.get(TimeBucket::Older).len(),
        "Leads grouped by date"
    );
    grouped
}

/// Render a stored timestamp like `Oct 19, 2026, 02:30 PM` in `tz`.
/// Unparseable input is returned unchanged.
pub fn format_date<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match parse_timestamp(raw) {
        Some(ts) => ts.with_timezone(tz).format(DISPLAY_DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}
