// RPTO Leads - platform/fs.rs
//
// Filesystem helpers shared by the store, importer and exporter.

use std::io;
use std::path::Path;

/// Read the full content of a file as a string.
///
/// For files with invalid UTF-8 (spreadsheet exports in legacy code pages),
/// uses lossy conversion.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    // Excel prefixes UTF-8 CSVs with a byte-order mark.
    Ok(text.strip_prefix('\u{feff}').unwrap_or(&text).to_string())
}

/// Size of a file in bytes.
pub fn file_size(path: &Path) -> io::Result<u64> {
    Ok(std::fs::metadata(path)?.len())
}

/// Write `bytes` to `path` atomically (write temp, then rename).
///
/// Creates parent directories as needed. A crash between write and rename
/// loses the new content but never corrupts the previous file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        e
    })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "File written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_parents_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("leads.json");

        write_atomic(&path, b"first").unwrap();
        // Leftover temp file from a previous crash must not matter.
        std::fs::write(dir.path().join("nested").join("leads.json.tmp"), b"junk").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        assert_eq!(file_size(&path).unwrap(), 6);
    }

    #[test]
    fn test_read_file_lossy_strips_bom() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("in.csv");
        std::fs::write(&path, b"\xEF\xBB\xBFname,phone\n\xFFx").unwrap();
        let text = read_file_lossy(&path).unwrap();
        assert!(text.starts_with("name,phone\n"));
        assert!(text.ends_with('x'));
    }
}
