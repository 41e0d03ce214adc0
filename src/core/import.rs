// RPTO Leads - core/import.rs
//
// CSV import of lead records and the downloadable sample template.
// Core layer: pure logic over an in-memory string, no I/O.
//
// Accepted format: one record per line (quoted fields may contain commas and
// doubled quotes, but not newlines). The header row is case-insensitive and
// must contain name, phone, place, status and remarks. Rows with the wrong
// cell count or without name/place are skipped, not fatal.

use crate::core::model::{digits_only, or_default, LeadStatus, NewLead};
use crate::util::constants::{
    EXPECTED_CSV_HEADERS, IMPORTED_REMARKS, NOT_AVAILABLE, OPTIONAL_CSV_HEADERS,
    PLACEHOLDER_IMAGE_URL,
};
use crate::util::error::ImportError;
use std::collections::HashMap;
use std::fmt;

/// Why a data row was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Cell count differs from the header row.
    ColumnCount { expected: usize, found: usize },

    /// Name or place was blank.
    MissingRequired,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnCount { expected, found } => write!(
                f,
                "incorrect column count ({found} cells, header has {expected})"
            ),
            Self::MissingRequired => f.write_str("missing required fields (Name or Place)"),
        }
    }
}

/// A dropped data row. `row` is 1-based over non-blank lines, header = 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: SkipReason,
}

/// Result of a successful parse: accepted records plus every skipped row.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub leads: Vec<NewLead>,
    pub skipped: Vec<SkippedRow>,
}

/// Split one CSV line into trimmed, unquoted fields.
///
/// `""` inside a quoted field is a literal quote. A line without any quote
/// characters takes a plain split.
pub fn parse_line(line: &str) -> Vec<String> {
    if !line.contains('"') {
        return line.split(',').map(|f| f.trim().to_string()).collect();
    }

    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields.iter().map(|f| clean_field(f)).collect()
}

/// Trim, drop one layer of enclosing quotes, collapse doubled quotes.
fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let unquoted = unquoted.strip_suffix('"').unwrap_or(unquoted);
    unquoted.replace("\"\"", "\"")
}

/// Parse uploaded CSV text into lead data.
///
/// Fails only on whole-file problems: no content, missing required headers,
/// or no row surviving validation.
pub fn parse_csv(text: &str) -> Result<ImportReport, ImportError> {
    let lines: Vec<&str> = text.split('\n').filter(|l| !l.trim().is_empty()).collect();
    let Some((header_line, rows)) = lines.split_first() else {
        return Err(ImportError::EmptyInput);
    };

    let headers = parse_line(&header_line.to_lowercase());
    let missing: Vec<String> = required_headers()
        .filter(|h| !headers.iter().any(|have| have == h))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "CSV header row is missing required columns");
        return Err(ImportError::MissingHeaders { missing });
    }

    let mut report = ImportReport::default();

    for (idx, line) in rows.iter().enumerate() {
        // Header is row 1.
        let row = idx + 2;
        let values = parse_line(line);
        if values.len() != headers.len() {
            let reason = SkipReason::ColumnCount {
                expected: headers.len(),
                found: values.len(),
            };
            tracing::warn!(row, %reason, "Skipping CSV row");
            report.skipped.push(SkippedRow { row, reason });
            continue;
        }

        // Duplicate header names: the rightmost column wins.
        let cells: HashMap<&str, &str> = headers
            .iter()
            .map(String::as_str)
            .zip(values.iter().map(String::as_str))
            .collect();

        match lead_from_cells(&cells) {
            Some(lead) => report.leads.push(lead),
            None => {
                let reason = SkipReason::MissingRequired;
                tracing::warn!(row, %reason, "Skipping CSV row");
                report.skipped.push(SkippedRow { row, reason });
            }
        }
    }

    if report.leads.is_empty() {
        return Err(ImportError::NoValidRows);
    }

    tracing::info!(
        accepted = report.leads.len(),
        skipped = report.skipped.len(),
        "CSV parsed"
    );
    Ok(report)
}

fn required_headers() -> impl Iterator<Item = &'static str> {
    EXPECTED_CSV_HEADERS
        .iter()
        .copied()
        .filter(|h| !OPTIONAL_CSV_HEADERS.contains(h))
}

/// Build lead data from one row, applying import defaults.
/// Returns `None` when name or place is blank.
fn lead_from_cells(cells: &HashMap<&str, &str>) -> Option<NewLead> {
    let cell = |key: &str| cells.get(key).copied().unwrap_or("");

    let name = cell("name");
    let place = cell("place");
    if name.is_empty() || place.is_empty() {
        return None;
    }

    let phone = match digits_only(cell("phone")) {
        digits if digits.is_empty() => NOT_AVAILABLE.to_string(),
        digits => digits,
    };

    Some(NewLead {
        name: name.to_string(),
        age: or_default(cell("age"), NOT_AVAILABLE),
        phone,
        email: or_default(cell("email"), NOT_AVAILABLE),
        place: place.to_string(),
        status: LeadStatus::parse_label(cell("status")).unwrap_or_default(),
        image_url: or_default(cell("image_url"), PLACEHOLDER_IMAGE_URL),
        remarks: or_default(cell("remarks"), IMPORTED_REMARKS),
    })
}

/// Two-row template using the import header set. The second row's remarks
/// contain a comma to show the quoting convention.
pub fn generate_sample_csv() -> String {
    [
        EXPECTED_CSV_HEADERS.join(","),
        "John Smith,35,9876543210,john.smith@example.com,Mumbai,New,https://placehold.co/100x100/e0f2fe/1e3a8a?text=JOHN,Initial interest in pilot course.".to_string(),
        "Jane Doe,28,9911223344,jane.doe@other.com,Delhi,Converted,https://placehold.co/100x100/e0f2fe/1e3a8a?text=JANE,\"Paid deposit, ready for practicals.\"".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_HEADER: &str = "name,age,phone,email,place,status,image_url,remarks";

    #[test]
    fn test_parse_line_plain() {
        assert_eq!(parse_line("a, b ,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_line_quoted_comma_and_escaped_quote() {
        let fields = parse_line(r#"Ravi,"Said ""call me"", then left",Pune"#);
        assert_eq!(fields, vec!["Ravi", r#"Said "call me", then left"#, "Pune"]);
    }

    #[test]
    fn test_parse_line_empty_fields() {
        assert_eq!(parse_line(",,"), vec!["", "", ""]);
        assert_eq!(parse_line(r#""",x"#), vec!["", "x"]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_csv("").unwrap_err(), ImportError::EmptyInput);
        assert_eq!(parse_csv("\n  \n\r\n").unwrap_err(), ImportError::EmptyInput);
    }

    #[test]
    fn test_header_only_has_no_valid_rows() {
        assert_eq!(parse_csv(FULL_HEADER).unwrap_err(), ImportError::NoValidRows);
    }

    #[test]
    fn test_missing_phone_header() {
        let err = parse_csv("name,place,status,remarks\nA,B,New,x").unwrap_err();
        assert_eq!(
            err,
            ImportError::MissingHeaders {
                missing: vec!["phone".to_string()]
            }
        );
    }

    #[test]
    fn test_optional_headers_may_be_absent() {
        let report = parse_csv("Name,Phone,Place,Status,Remarks\nAsha,98 76,Pune,Lost,").unwrap();
        let lead = &report.leads[0];
        assert_eq!(lead.age, NOT_AVAILABLE);
        assert_eq!(lead.email, NOT_AVAILABLE);
        assert_eq!(lead.image_url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(lead.phone, "9876");
        assert_eq!(lead.status, LeadStatus::Lost);
        assert_eq!(lead.remarks, IMPORTED_REMARKS);
    }

    #[test]
    fn test_trailing_comma_row_is_skipped() {
        let text = format!(
            "{FULL_HEADER}\nA,30,111,a@x.com,Goa,New,,hi,\nB,31,222,b@x.com,Goa,New,,ok"
        );
        let report = parse_csv(&text).unwrap();
        assert_eq!(report.leads.len(), 1);
        assert_eq!(report.leads[0].name, "B");
        assert_eq!(
            report.skipped,
            vec![SkippedRow {
                row: 2,
                reason: SkipReason::ColumnCount {
                    expected: 8,
                    found: 9
                }
            }]
        );
    }

    #[test]
    fn test_rows_without_name_or_place_are_skipped() {
        let text = "name,phone,place,status,remarks\n,1,Goa,New,x\nA,1,  ,New,x\nC,1,Goa,New,x";
        let report = parse_csv(text).unwrap();
        assert_eq!(report.leads.len(), 1);
        assert_eq!(report.skipped.len(), 2);
        assert!(report
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::MissingRequired));
    }

    #[test]
    fn test_invalid_status_and_phone_normalise() {
        let text = "name,phone,place,status,remarks\nA,n/a,Goa,pending,x\nB,,Goa,contacted,y";
        let report = parse_csv(text).unwrap();
        assert_eq!(report.leads[0].status, LeadStatus::New);
        assert_eq!(report.leads[0].phone, NOT_AVAILABLE);
        // Status match is case-sensitive.
        assert_eq!(report.leads[1].status, LeadStatus::New);
        assert_eq!(report.leads[1].phone, NOT_AVAILABLE);
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "name,phone,place,status,remarks\r\nA,123,Goa,Converted,done\r\n";
        let report = parse_csv(text).unwrap();
        assert_eq!(report.leads[0].remarks, "done");
        assert_eq!(report.leads[0].status, LeadStatus::Converted);
    }

    #[test]
    fn test_sample_csv_parses_to_two_records() {
        let report = parse_csv(&generate_sample_csv()).unwrap();
        assert_eq!(report.leads.len(), 2);
        assert!(report.skipped.is_empty());
        assert_eq!(report.leads[0].name, "John Smith");
        assert_eq!(report.leads[1].remarks, "Paid deposit, ready for practicals.");
        assert_eq!(report.leads[1].status, LeadStatus::Converted);
    }
}
