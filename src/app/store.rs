// RPTO Leads - app/store.rs
//
// Lead persistence behind the `LeadStore` trait.
//
// Stores are constructed explicitly and passed to whatever needs them.
// Two implementations:
// - `MemoryStore`: a plain Vec, for tests and dry runs.
// - `JsonFileStore`: a versioned JSON table on disk, rewritten atomically
//   (write temp, rename) after every mutation. A failed write leaves both
//   the file and the in-memory table unchanged.

use crate::core::model::{Lead, LeadUpdate, NewLead};
use crate::platform::fs::write_atomic;
use crate::util::error::StoreError;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Version stamp of the on-disk table. Mismatches are refused, not guessed at.
pub const STORE_VERSION: u32 = 1;

/// Persistent lead table.
///
/// Implementations assign `id` and `created_at` on insert and never change
/// them afterwards.
pub trait LeadStore {
    /// Every stored lead, in storage order.
    fn list_all(&self) -> Result<Vec<Lead>, StoreError>;

    /// One lead by id.
    fn get(&self, id: &str) -> Result<Option<Lead>, StoreError>;

    /// Insert one lead, returning it with its assigned identity.
    fn insert_one(&mut self, data: NewLead) -> Result<Lead, StoreError>;

    /// Insert many leads in one write. Returns the number inserted.
    fn insert_many(&mut self, data: Vec<NewLead>) -> Result<usize, StoreError>;

    /// Apply a partial update. Fails with `NotFound` for an unknown id.
    fn update(&mut self, id: &str, changes: &LeadUpdate) -> Result<(), StoreError>;

    /// Remove a lead. Fails with `NotFound` for an unknown id.
    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
}

/// Fresh random identifier.
fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current instant as an ISO-8601 string with millisecond precision.
fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// In-memory store
// =============================================================================

/// Lead table held in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    leads: Vec<Lead>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing leads (ids are trusted as given).
    pub fn with_leads(leads: Vec<Lead>) -> Self {
        Self { leads }
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.leads
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }
}

impl LeadStore for MemoryStore {
    fn list_all(&self) -> Result<Vec<Lead>, StoreError> {
        Ok(self.leads.clone())
    }

    fn get(&self, id: &str) -> Result<Option<Lead>, StoreError> {
        Ok(self.leads.iter().find(|l| l.id == id).cloned())
    }

    fn insert_one(&mut self, data: NewLead) -> Result<Lead, StoreError> {
        let lead = Lead::from_new(new_id(), now_iso(), data);
        self.leads.push(lead.clone());
        Ok(lead)
    }

    fn insert_many(&mut self, data: Vec<NewLead>) -> Result<usize, StoreError> {
        let created_at = now_iso();
        let count = data.len();
        self.leads.extend(
            data.into_iter()
                .map(|d| Lead::from_new(new_id(), created_at.clone(), d)),
        );
        Ok(count)
    }

    fn update(&mut self, id: &str, changes: &LeadUpdate) -> Result<(), StoreError> {
        let idx = self.position(id)?;
        changes.apply_to(&mut self.leads[idx]);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let idx = self.position(id)?;
        self.leads.remove(idx);
        Ok(())
    }
}

// =============================================================================
// JSON file store
// =============================================================================

/// On-disk shape of the lead table.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    leads: Vec<Lead>,
}

/// Lead table persisted as a JSON document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    table: MemoryStore,
}

impl JsonFileStore {
    /// Open the table at `path`. A missing file is an empty table; the file
    /// is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let leads = match std::fs::read_to_string(&path) {
            Ok(content) => parse_table(&path, &content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No lead table yet; starting empty");
                Vec::new()
            }
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };

        tracing::info!(path = %path.display(), leads = leads.len(), "Lead table opened");
        Ok(Self {
            path,
            table: MemoryStore::with_leads(leads),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `op` against a copy of the table and commit it only once the
    /// copy has been written to disk.
    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut MemoryStore) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut next = self.table.clone();
        let out = op(&mut next)?;
        self.save(&next.leads)?;
        self.table = next;
        Ok(out)
    }

    fn save(&self, leads: &[Lead]) -> Result<(), StoreError> {
        #[derive(Serialize)]
        struct StoreFileRef<'a> {
            version: u32,
            leads: &'a [Lead],
        }

        let json = serde_json::to_string_pretty(&StoreFileRef {
            version: STORE_VERSION,
            leads,
        })
        .map_err(|e| StoreError::Json {
            path: self.path.clone(),
            source: e,
        })?;

        write_atomic(&self.path, json.as_bytes()).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

fn parse_table(path: &Path, content: &str) -> Result<Vec<Lead>, StoreError> {
    let file: StoreFile = serde_json::from_str(content).map_err(|e| StoreError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    if file.version != STORE_VERSION {
        return Err(StoreError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: file.version,
            expected: STORE_VERSION,
        });
    }
    Ok(file.leads)
}

impl LeadStore for JsonFileStore {
    fn list_all(&self) -> Result<Vec<Lead>, StoreError> {
        self.table.list_all()
    }

    fn get(&self, id: &str) -> Result<Option<Lead>, StoreError> {
        self.table.get(id)
    }

    fn insert_one(&mut self, data: NewLead) -> Result<Lead, StoreError> {
        let lead = self.mutate(|t| t.insert_one(data))?;
        tracing::debug!(id = %lead.id, "Lead inserted");
        Ok(lead)
    }

    fn insert_many(&mut self, data: Vec<NewLead>) -> Result<usize, StoreError> {
        let count = self.mutate(|t| t.insert_many(data))?;
        tracing::info!(count, "Leads bulk inserted");
        Ok(count)
    }

    fn update(&mut self, id: &str, changes: &LeadUpdate) -> Result<(), StoreError> {
        self.mutate(|t| t.update(id, changes))?;
        tracing::debug!(id, "Lead updated");
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.mutate(|t| t.delete(id))?;
        tracing::debug!(id, "Lead deleted");
        Ok(())
    }
}
