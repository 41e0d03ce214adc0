// RPTO Leads - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Import errors are user-facing: their Display text is shown verbatim.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all lead operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LeadsError {
    /// CSV import failed as a whole.
    Import(ImportError),

    /// CSV export failed.
    Export(ExportError),

    /// The lead table could not be read or written, or a lead was missing.
    Store(StoreError),

    /// Manually entered lead data was rejected.
    Validation(ValidationError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for LeadsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Import(e) => write!(f, "Import failed: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Store(e) => write!(f, "Store error: {e}"),
            Self::Validation(e) => write!(f, "Invalid lead: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LeadsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Import(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Validation(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Import errors
// ---------------------------------------------------------------------------

/// Whole-file import failures. Row-level defects are never errors; they are
/// reported as skipped rows instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The input contained no non-blank lines.
    EmptyInput,

    /// The header row lacks one or more required columns.
    MissingHeaders { missing: Vec<String> },

    /// Every data row was skipped (or there were none).
    NoValidRows,

    /// The import file exceeds the size cap.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => f.write_str("The uploaded file is empty or invalid."),
            Self::MissingHeaders { missing } => write!(
                f,
                "Missing required column headers: {}. Please use the sample template.",
                missing.join(", ")
            ),
            Self::NoValidRows => f.write_str("No valid leads found in the file after processing."),
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "'{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<ImportError> for LeadsError {
    fn from(e: ImportError) -> Self {
        Self::Import(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// I/O error flushing the export writer.
    Io { source: io::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv { source } => write!(f, "CSV export error: {source}"),
            Self::Io { source } => write!(f, "Export I/O error: {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv { source } => Some(source),
            Self::Io { source } => Some(source),
        }
    }
}

impl From<ExportError> for LeadsError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors from the lead table.
#[derive(Debug)]
pub enum StoreError {
    /// No lead has the given id.
    NotFound { id: String },

    /// The table file was written by an incompatible version.
    UnsupportedVersion { path: PathBuf, found: u32, expected: u32 },

    /// The table file is not valid JSON.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// I/O error reading or writing the table file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "No lead with id '{id}'"),
            Self::UnsupportedVersion {
                path,
                found,
                expected,
            } => write!(
                f,
                "Lead table '{}' has version {found}, expected {expected}",
                path.display()
            ),
            Self::Json { path, source } => {
                write!(f, "Lead table '{}' is corrupt: {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Lead table I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<StoreError> for LeadsError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// Manual-entry validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was blank.
    MissingField { field: &'static str },

    /// A status label is not one of the pipeline stages.
    UnknownStatus { value: String },

    /// The lead has no phone number to message.
    NoPhone,

    /// The welcome message only goes to converted leads.
    NotConverted { status: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field: "phone" } => {
                f.write_str("Phone number is required for WhatsApp")
            }
            Self::MissingField { field } => write!(f, "{field} is required"),
            Self::UnknownStatus { value } => write!(
                f,
                "Unknown status '{value}'. Expected one of: New, Contacted, Converted, Lost"
            ),
            Self::NoPhone => f.write_str("Phone number is missing or invalid for WhatsApp."),
            Self::NotConverted { status } => write!(
                f,
                "Greeting is only for Converted leads; this lead is {status}"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for LeadsError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Problems found while loading configuration. These never stop the
/// application; they are reported and the affected values fall back to
/// defaults.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for lead results.
pub type Result<T> = std::result::Result<T, LeadsError>;
