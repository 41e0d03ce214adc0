// RPTO Leads - core/filter.rs
//
// Composable filter engine for leads.
// All active filters are AND-combined.
// Core layer: pure logic, no I/O dependencies.

use crate::core::model::{digits_only, Lead, LeadStatus};
use crate::core::timeline::parse_timestamp;

/// Complete filter state. All fields are AND-combined when applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilter {
    /// Case-insensitive substring of the name. Empty = no filter.
    pub name: String,

    /// Case-insensitive substring of the place. Empty = no filter.
    pub place: String,

    /// Digits-only substring of the phone. Non-digits are ignored on both
    /// sides, so "98-7" matches a stored "98765".
    pub phone: String,

    /// Exact status. None = all.
    pub status: Option<LeadStatus>,

    /// `YYYY-MM-DD` compared against the first 10 characters of
    /// `created_at`, with no time zone conversion. Empty = no filter.
    pub date: String,
}

impl LeadFilter {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.place.is_empty()
            && digits_only(&self.phone).is_empty()
            && self.status.is_none()
            && self.date.is_empty()
    }

    /// Quick-filter for one pipeline stage.
    pub fn with_status(status: LeadStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// Sort leads newest first by `created_at`.
///
/// Stable; leads whose timestamp cannot be parsed go last in their
/// original relative order.
pub fn sort_newest_first(leads: &mut [Lead]) {
    leads.sort_by_cached_key(|lead| std::cmp::Reverse(parse_timestamp(&lead.created_at)));
}

/// Apply filters to a slice of leads, returning indices of matching leads.
///
/// Indices point into the original slice and keep its order.
pub fn apply_filters(leads: &[Lead], filter: &LeadFilter) -> Vec<usize> {
    if filter.is_empty() {
        return (0..leads.len()).collect();
    }

    let prepared = Prepared {
        name: filter.name.to_lowercase(),
        place: filter.place.to_lowercase(),
        phone: digits_only(&filter.phone),
        status: filter.status,
        date: filter.date.as_str(),
    };

    leads
        .iter()
        .enumerate()
        .filter(|(_, lead)| prepared.matches(lead))
        .map(|(idx, _)| idx)
        .collect()
}

/// Filter values normalised once per call.
struct Prepared<'f> {
    name: String,
    place: String,
    phone: String,
    status: Option<LeadStatus>,
    date: &'f str,
}

impl Prepared<'_> {
    /// Check if a single lead matches all active filters.
    fn matches(&self, lead: &Lead) -> bool {
        if !self.name.is_empty() && !lead.name.to_lowercase().contains(&self.name) {
            return false;
        }

        if !self.place.is_empty() && !lead.place.to_lowercase().contains(&self.place) {
            return false;
        }

        if !self.phone.is_empty() && !digits_only(&lead.phone).contains(&self.phone) {
            return false;
        }

        if let Some(status) = self.status {
            if lead.status != status {
                return false;
            }
        }

        if !self.date.is_empty() && date_part(&lead.created_at) != self.date {
            return false;
        }

        true
    }
}

/// First 10 characters of a timestamp (the calendar date of an ISO string).
fn date_part(created_at: &str) -> &str {
    match created_at.char_indices().nth(10) {
        Some((idx, _)) => &created_at[..idx],
        None => created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_lead(id: &str, name: &str, place: &str, phone: &str, created_at: &str) -> Lead {
        Lead {
            id: id.to_string(),
            name: name.to_string(),
            age: "N/A".to_string(),
            phone: phone.to_string(),
            email: "N/A".to_string(),
            place: place.to_string(),
            status: LeadStatus::New,
            image_url: String::new(),
            remarks: String::new(),
            created_at: created_at.to_string(),
        }
    }

    fn sample() -> Vec<Lead> {
        vec![
            make_lead("1", "Arjun Mehta", "Mumbai", "98-765", "2026-10-19T08:00:00.000Z"),
            make_lead("2", "Priya Nair", "Kochi", "12345", "2026-10-18T23:30:00.000Z"),
            make_lead("3", "ARJUN Das", "Navi Mumbai", "N/A", "2026-10-12T10:00:00.000Z"),
        ]
    }

    #[test]
    fn test_empty_filter_returns_all() {
        let leads = sample();
        assert_eq!(apply_filters(&leads, &LeadFilter::default()), vec![0, 1, 2]);
    }

    #[test]
    fn test_name_and_place_case_insensitive() {
        let leads = sample();
        let filter = LeadFilter {
            name: "arjun".to_string(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&leads, &filter), vec![0, 2]);

        let filter = LeadFilter {
            name: "arjun".to_string(),
            place: "NAVI".to_string(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&leads, &filter), vec![2]);
    }

    #[test]
    fn test_phone_digits_only_match() {
        let leads = sample();
        let filter = LeadFilter {
            phone: "765".to_string(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&leads, &filter), vec![0]);

        let filter = LeadFilter {
            phone: "8-7".to_string(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&leads, &filter), vec![0]);
    }

    #[test]
    fn test_phone_filter_without_digits_is_inactive() {
        let leads = sample();
        let filter = LeadFilter {
            phone: "--".to_string(),
            ..Default::default()
        };
        assert!(filter.is_empty());
        assert_eq!(apply_filters(&leads, &filter).len(), 3);
    }

    #[test]
    fn test_status_filter() {
        let mut leads = sample();
        leads[1].status = LeadStatus::Converted;
        let result = apply_filters(&leads, &LeadFilter::with_status(LeadStatus::Converted));
        assert_eq!(result, vec![1]);
    }

    #[test]
    fn test_date_matches_raw_prefix() {
        let leads = sample();
        let filter = LeadFilter {
            date: "2026-10-18".to_string(),
            ..Default::default()
        };
        // No zone conversion: 23:30Z stays on the 18th.
        assert_eq!(apply_filters(&leads, &filter), vec![1]);
    }

    #[test]
    fn test_filtering_is_repeatable() {
        let leads = sample();
        let filter = LeadFilter {
            name: "a".to_string(),
            ..Default::default()
        };
        let first = apply_filters(&leads, &filter);
        let second = apply_filters(&leads, &filter);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut leads = sample();
        leads.push(make_lead("4", "Bad", "X", "1", "yesterday-ish"));
        leads.swap(0, 2);
        sort_newest_first(&mut leads);
        let ids: Vec<_> = leads.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_date_part_short_input() {
        assert_eq!(date_part("2026-10"), "2026-10");
        assert_eq!(date_part("2026-10-19T00:00:00Z"), "2026-10-19");
    }
}
