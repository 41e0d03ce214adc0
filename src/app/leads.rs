// RPTO Leads - app/leads.rs
//
// Lead workflow over an injected store: listing with filters and date
// groups, manual create/update/delete, CSV import/export, greetings.

use crate::app::store::LeadStore;
use crate::core::export::export_to_string;
use crate::core::filter::{apply_filters, sort_newest_first, LeadFilter};
use crate::core::greeting::{contact_message, greeting_text};
use crate::core::import::{parse_csv, SkippedRow};
use crate::core::model::{Lead, LeadDraft, LeadStatus, LeadUpdate};
use crate::core::timeline::{group_by_date, GroupedLeads};
use crate::platform::fs::{file_size, read_file_lossy};
use crate::util::constants::MAX_IMPORT_FILE_SIZE;
use crate::util::error::{ImportError, LeadsError, Result, StoreError, ValidationError};
use chrono::{DateTime, NaiveDate, TimeZone};
use std::fmt::Display;
use std::path::Path;

/// Outcome of a successful CSV import.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Leads written to the store.
    pub inserted: usize,

    /// Rows dropped during parsing, with reasons.
    pub skipped: Vec<SkippedRow>,
}

/// Filtered leads, newest first.
#[derive(Debug, Clone)]
pub struct LeadView {
    pub leads: Vec<Lead>,
}

impl LeadView {
    /// Partition the view into date buckets relative to `now`.
    pub fn grouped<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> GroupedLeads<'_> {
        group_by_date(&self.leads, now)
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }
}

/// Lead operations over a store.
pub struct LeadBook<S: LeadStore> {
    store: S,
}

impl<S: LeadStore> LeadBook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All leads, newest first.
    pub fn load_sorted(&self) -> Result<Vec<Lead>> {
        let mut leads = self.store.list_all()?;
        sort_newest_first(&mut leads);
        Ok(leads)
    }

    /// Leads matching `filter`, newest first.
    pub fn view(&self, filter: &LeadFilter) -> Result<LeadView> {
        let all = self.load_sorted()?;
        let total = all.len();
        let keep = apply_filters(&all, filter);

        let mut keep = keep.into_iter().peekable();
        let leads: Vec<Lead> = all
            .into_iter()
            .enumerate()
            .filter_map(|(idx, lead)| {
                if keep.peek() == Some(&idx) {
                    keep.next();
                    Some(lead)
                } else {
                    None
                }
            })
            .collect();

        tracing::debug!(total, shown = leads.len(), "Lead view computed");
        Ok(LeadView { leads })
    }

    pub fn get(&self, id: &str) -> Result<Lead> {
        self.store
            .get(id)?
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() }.into())
    }

    /// Validate a manual entry and store it.
    pub fn create(&mut self, draft: LeadDraft) -> Result<Lead> {
        let data = draft.normalize()?;
        let lead = self.store.insert_one(data)?;
        tracing::info!(id = %lead.id, "Lead created");
        Ok(lead)
    }

    /// Edit a stored lead under the same rules as manual entry.
    pub fn update(&mut self, id: &str, changes: &LeadUpdate) -> Result<Lead> {
        changes.validate()?;
        self.store.update(id, changes)?;
        tracing::info!(id, "Lead updated");
        self.get(id)
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        self.store.delete(id)?;
        tracing::info!(id, "Lead deleted");
        Ok(())
    }

    /// Parse CSV text and bulk-insert every accepted row.
    pub fn import_csv(&mut self, text: &str) -> Result<ImportOutcome> {
        let report = parse_csv(text)?;
        let inserted = self.store.insert_many(report.leads)?;
        tracing::info!(
            inserted,
            skipped = report.skipped.len(),
            "CSV import complete"
        );
        Ok(ImportOutcome {
            inserted,
            skipped: report.skipped,
        })
    }

    /// Read a CSV file (size-capped) and import it.
    pub fn import_file(&mut self, path: &Path) -> Result<ImportOutcome> {
        let size = file_size(path).map_err(|e| LeadsError::Io {
            path: path.to_path_buf(),
            operation: "stat import file",
            source: e,
        })?;
        if size > MAX_IMPORT_FILE_SIZE {
            return Err(ImportError::FileTooLarge {
                path: path.to_path_buf(),
                size,
                max_size: MAX_IMPORT_FILE_SIZE,
            }
            .into());
        }

        let text = read_file_lossy(path).map_err(|e| LeadsError::Io {
            path: path.to_path_buf(),
            operation: "read import file",
            source: e,
        })?;
        tracing::info!(path = %path.display(), bytes = size, "Importing CSV file");
        self.import_csv(&text)
    }

    /// CSV of the leads matching `filter`, with dates rendered in `tz`.
    pub fn export_csv<Tz>(&self, filter: &LeadFilter, tz: &Tz) -> Result<String>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let view = self.view(filter)?;
        let csv = export_to_string(&view.leads, tz)?;
        tracing::info!(count = view.len(), "Leads exported");
        Ok(csv)
    }

    /// First-contact WhatsApp message. Fails for leads without a phone.
    pub fn contact(&self, id: &str) -> Result<String> {
        let lead = self.get(id)?;
        if !lead.has_phone() {
            return Err(ValidationError::NoPhone.into());
        }
        Ok(contact_message(&lead.name))
    }

    /// Welcome message for a stored lead. Only converted leads get one.
    pub fn greeting(&self, id: &str) -> Result<String> {
        let lead = self.get(id)?;
        if lead.status != LeadStatus::Converted {
            return Err(ValidationError::NotConverted {
                status: lead.status.to_string(),
            }
            .into());
        }
        Ok(greeting_text(&lead.name, &lead.place))
    }
}

/// `<prefix>_YYYY-MM-DD.csv`
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_{}.csv", date.format("%Y-%m-%d"))
}
