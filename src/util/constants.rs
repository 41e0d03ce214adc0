// RPTO Leads - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "RPTO Leads";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "RptoLeads";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Lead field defaults
// =============================================================================

/// Stored in place of a missing age or email.
pub const NOT_AVAILABLE: &str = "N/A";

/// Image shown for leads without a photo.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/100x100/e0f2fe/1e3a8a?text=NO+IMG";

/// Remarks given to every imported row that carries none of its own.
pub const IMPORTED_REMARKS: &str = "Imported via bulk upload.";

// =============================================================================
// CSV import / export
// =============================================================================

/// Column set understood by the importer, in template order.
pub const EXPECTED_CSV_HEADERS: &[&str] = &[
    "name", "age", "phone", "email", "place", "status", "image_url", "remarks",
];

/// Columns of `EXPECTED_CSV_HEADERS` that an import file may leave out.
pub const OPTIONAL_CSV_HEADERS: &[&str] = &["image_url", "age", "email"];

/// Header row written by the exporter. Not the same set as the import headers.
pub const EXPORT_CSV_HEADERS: &[&str] = &[
    "ID",
    "Name",
    "Age",
    "Phone",
    "Email",
    "Place",
    "Status",
    "Remarks",
    "Created At",
];

/// Largest CSV file accepted for import.
pub const MAX_IMPORT_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10 MiB

/// Default prefix for export file names (`<prefix>_YYYY-MM-DD.csv`).
pub const DEFAULT_EXPORT_FILE_PREFIX: &str = "rpto_leads_export";

/// File name offered for the downloadable import template.
pub const SAMPLE_CSV_FILE_NAME: &str = "rpto_leads_template.csv";

// =============================================================================
// Timeline
// =============================================================================

/// Leads newer than this many days (and not today/yesterday) are "recent".
pub const RECENT_WINDOW_DAYS: u64 = 7;

/// Human-readable timestamp format used in exports and listings.
pub const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Lead table file name (stored in the platform data directory).
pub const STORE_FILE_NAME: &str = "leads.json";

/// Maximum length of the export file prefix.
pub const MAX_EXPORT_PREFIX_LEN: usize = 64;
