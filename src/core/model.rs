// RPTO Leads - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants::{NOT_AVAILABLE, PLACEHOLDER_IMAGE_URL};
use crate::util::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// Lead
// =============================================================================

/// A prospective trainee tracked through the status pipeline.
///
/// `id` and `created_at` are assigned once by the store and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    /// Opaque unique identifier.
    pub id: String,

    pub name: String,

    /// Free text; "N/A" when unknown.
    pub age: String,

    /// Digits only, or "N/A" for imported rows without a phone.
    pub phone: String,

    /// Free text; "N/A" when unknown.
    pub email: String,

    pub place: String,

    pub status: LeadStatus,

    pub image_url: String,

    /// Multi-line notes about contact attempts.
    pub remarks: String,

    /// ISO-8601 creation timestamp. Drives sort order and date grouping.
    pub created_at: String,
}

impl Lead {
    /// Attach store-assigned identity to lead data.
    pub fn from_new(id: String, created_at: String, data: NewLead) -> Self {
        Self {
            id,
            name: data.name,
            age: data.age,
            phone: data.phone,
            email: data.email,
            place: data.place,
            status: data.status,
            image_url: data.image_url,
            remarks: data.remarks,
            created_at,
        }
    }

    /// True when the lead has a phone number usable for messaging.
    pub fn has_phone(&self) -> bool {
        !self.phone.is_empty() && self.phone != NOT_AVAILABLE
    }
}

/// Lead data without identity, as handed to the store for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub age: String,
    pub phone: String,
    pub email: String,
    pub place: String,
    pub status: LeadStatus,
    pub image_url: String,
    pub remarks: String,
}

// =============================================================================
// Status
// =============================================================================

/// Fixed pipeline stages. Anything unrecognised normalises to `New`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Converted,
    Lost,
}

impl LeadStatus {
    /// Returns all variants in pipeline order.
    pub fn all() -> &'static [LeadStatus] {
        &[
            LeadStatus::New,
            LeadStatus::Contacted,
            LeadStatus::Converted,
            LeadStatus::Lost,
        ]
    }

    /// Human-readable label for display. Also the stored/CSV spelling.
    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Converted => "Converted",
            LeadStatus::Lost => "Lost",
        }
    }

    /// Exact, case-sensitive label match.
    pub fn parse_label(raw: &str) -> Option<LeadStatus> {
        Self::all().iter().copied().find(|s| s.label() == raw)
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lenient parse for typed input: case-insensitive and trimmed.
impl FromStr for LeadStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|st| st.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownStatus {
                value: s.to_string(),
            })
    }
}

// =============================================================================
// Manual entry
// =============================================================================

/// Raw form input for a lead entered by hand. Blank strings mean "not given".
#[derive(Debug, Clone, Default)]
pub struct LeadDraft {
    pub name: String,
    pub age: String,
    pub phone: String,
    pub email: String,
    pub place: String,
    pub status: LeadStatus,
    pub image_url: String,
    pub remarks: String,
}

impl LeadDraft {
    /// Validate and apply manual-entry defaults.
    ///
    /// Name, place and phone are required. Age and email fall back to "N/A",
    /// image to the placeholder, remarks to empty.
    pub fn normalize(self) -> Result<NewLead, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField { field: "name" });
        }
        let place = self.place.trim();
        if place.is_empty() {
            return Err(ValidationError::MissingField { field: "place" });
        }
        if self.phone.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "phone" });
        }

        Ok(NewLead {
            name: name.to_string(),
            age: or_default(&self.age, NOT_AVAILABLE),
            phone: digits_only(&self.phone),
            email: or_default(&self.email, NOT_AVAILABLE),
            place: place.to_string(),
            status: self.status,
            image_url: or_default(&self.image_url, PLACEHOLDER_IMAGE_URL),
            remarks: self.remarks,
        })
    }
}

// =============================================================================
// Partial update
// =============================================================================

/// Field-level changes to an existing lead. `None` leaves a field untouched;
/// `id` and `created_at` cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadUpdate {
    pub name: Option<String>,
    pub age: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub place: Option<String>,
    pub status: Option<LeadStatus>,
    pub image_url: Option<String>,
    pub remarks: Option<String>,
}

impl LeadUpdate {
    /// Returns true if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check the changed fields against the manual-entry rules: name and
    /// place may not be blanked and a new phone must contain digits.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if matches!(self.name, Some(ref v) if v.trim().is_empty()) {
            return Err(ValidationError::MissingField { field: "name" });
        }
        if matches!(self.place, Some(ref v) if v.trim().is_empty()) {
            return Err(ValidationError::MissingField { field: "place" });
        }
        if matches!(self.phone, Some(ref v) if digits_only(v).is_empty()) {
            return Err(ValidationError::MissingField { field: "phone" });
        }
        Ok(())
    }

    /// Apply the changes in place with the manual-entry defaults: phone
    /// reduced to digits, blank age/email to "N/A", blank image to the
    /// placeholder.
    pub fn apply_to(&self, lead: &mut Lead) {
        if let Some(ref v) = self.name {
            lead.name = v.trim().to_string();
        }
        if let Some(ref v) = self.age {
            lead.age = or_default(v, NOT_AVAILABLE);
        }
        if let Some(ref v) = self.phone {
            lead.phone = digits_only(v);
        }
        if let Some(ref v) = self.email {
            lead.email = or_default(v, NOT_AVAILABLE);
        }
        if let Some(ref v) = self.place {
            lead.place = v.trim().to_string();
        }
        if let Some(status) = self.status {
            lead.status = status;
        }
        if let Some(ref v) = self.image_url {
            lead.image_url = or_default(v, PLACEHOLDER_IMAGE_URL);
        }
        if let Some(ref v) = self.remarks {
            lead.remarks = v.clone();
        }
    }
}

// =============================================================================
// Field helpers
// =============================================================================

/// Strip everything except ASCII digits.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// `value`, or `default` when it is empty.
pub(crate) fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> LeadDraft {
        LeadDraft {
            name: "  Asha Rao ".to_string(),
            place: "Pune".to_string(),
            phone: "+91 98765-43210".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_applies_manual_defaults() {
        let lead = draft().normalize().unwrap();
        assert_eq!(lead.name, "Asha Rao");
        assert_eq!(lead.phone, "919876543210");
        assert_eq!(lead.age, NOT_AVAILABLE);
        assert_eq!(lead.email, NOT_AVAILABLE);
        assert_eq!(lead.image_url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(lead.remarks, "");
        assert_eq!(lead.status, LeadStatus::New);
    }

    #[test]
    fn test_normalize_requires_name_place_phone() {
        let mut d = draft();
        d.name = "   ".to_string();
        assert_eq!(
            d.normalize(),
            Err(ValidationError::MissingField { field: "name" })
        );

        let mut d = draft();
        d.place.clear();
        assert_eq!(
            d.normalize(),
            Err(ValidationError::MissingField { field: "place" })
        );

        let mut d = draft();
        d.phone = " ".to_string();
        assert_eq!(
            d.normalize(),
            Err(ValidationError::MissingField { field: "phone" })
        );
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(LeadStatus::parse_label("Converted"), Some(LeadStatus::Converted));
        assert_eq!(LeadStatus::parse_label("converted"), None);
        assert_eq!("converted".parse::<LeadStatus>(), Ok(LeadStatus::Converted));
        assert!("pending".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn test_update_leaves_identity_alone() {
        let mut lead = Lead::from_new(
            "id-1".to_string(),
            "2026-01-01T10:00:00.000Z".to_string(),
            draft().normalize().unwrap(),
        );
        let update = LeadUpdate {
            phone: Some("98-765".to_string()),
            status: Some(LeadStatus::Contacted),
            remarks: Some("Called twice.\nNo answer.".to_string()),
            ..Default::default()
        };
        update.apply_to(&mut lead);
        assert_eq!(lead.id, "id-1");
        assert_eq!(lead.created_at, "2026-01-01T10:00:00.000Z");
        assert_eq!(lead.phone, "98765");
        assert_eq!(lead.status, LeadStatus::Contacted);
        assert_eq!(lead.name, "Asha Rao");
        assert!(!update.is_empty());
        assert!(LeadUpdate::default().is_empty());
    }

    #[test]
    fn test_update_applies_manual_defaults() {
        let mut lead = Lead::from_new(
            "id-1".to_string(),
            "2026-01-01T10:00:00.000Z".to_string(),
            draft().normalize().unwrap(),
        );
        lead.age = "31".to_string();
        lead.email = "asha@example.com".to_string();
        lead.image_url = "https://example.com/asha.png".to_string();

        let update = LeadUpdate {
            age: Some(String::new()),
            email: Some(String::new()),
            image_url: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(update.validate(), Ok(()));
        update.apply_to(&mut lead);
        assert_eq!(lead.age, NOT_AVAILABLE);
        assert_eq!(lead.email, NOT_AVAILABLE);
        assert_eq!(lead.image_url, PLACEHOLDER_IMAGE_URL);
    }

    #[test]
    fn test_update_validation() {
        let no_digits = LeadUpdate {
            phone: Some("call later".to_string()),
            ..Default::default()
        };
        assert_eq!(
            no_digits.validate(),
            Err(ValidationError::MissingField { field: "phone" })
        );

        let blank_place = LeadUpdate {
            place: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            blank_place.validate(),
            Err(ValidationError::MissingField { field: "place" })
        );

        let fine = LeadUpdate {
            phone: Some("+91 99".to_string()),
            ..Default::default()
        };
        assert_eq!(fine.validate(), Ok(()));
    }
}
