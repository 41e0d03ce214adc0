// RPTO Leads - core/export.rs
//
// CSV export of leads for spreadsheets.
// Core layer: writes to any Write trait object.
//
// The export header differs from the import template and `Created At` is
// human-formatted, so an export cannot be fed back into the importer.

use crate::core::model::Lead;
use crate::core::timeline::format_date;
use crate::util::constants::EXPORT_CSV_HEADERS;
use crate::util::error::ExportError;
use chrono::TimeZone;
use std::fmt::Display;
use std::io::Write;

/// Export leads to CSV, rendering `created_at` in `tz`.
///
/// Writes: ID, Name, Age, Phone, Email, Place, Status, Remarks, Created At.
/// A field is quoted only when it holds a comma, quote, or line break.
/// Every record ends with `\n`. An empty slice writes nothing, not even
/// the header.
pub fn export_csv<W, Tz>(leads: &[Lead], writer: W, tz: &Tz) -> Result<usize, ExportError>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if leads.is_empty() {
        return Ok(0);
    }

    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer
        .write_record(EXPORT_CSV_HEADERS)
        .map_err(|e| ExportError::Csv { source: e })?;

    let mut count = 0;
    for lead in leads {
        let created = format_date(&lead.created_at, tz);
        csv_writer
            .write_record([
                lead.id.as_str(),
                &lead.name,
                &lead.age,
                &lead.phone,
                &lead.email,
                &lead.place,
                lead.status.label(),
                &lead.remarks,
                &created,
            ])
            .map_err(|e| ExportError::Csv { source: e })?;
        count += 1;
    }

    csv_writer
        .flush()
        .map_err(|e| ExportError::Io { source: e })?;

    tracing::debug!(count, "Leads exported to CSV");
    Ok(count)
}

/// Export leads to an in-memory CSV string. Records are `\n`-separated
/// with no trailing terminator.
pub fn export_to_string<Tz>(leads: &[Lead], tz: &Tz) -> Result<String, ExportError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut buf = Vec::new();
    export_csv(leads, &mut buf, tz)?;
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    // Every field was a &str, so the buffer is valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
