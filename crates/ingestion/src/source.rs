//! Raw trade records from a directory of delimited files.
//!
//! Each file is a header-driven table; one [`RawRecord`] is produced per data
//! row. A file that cannot be opened or parsed yields an error for that file
//! only, and the caller decides whether to carry on.

use csv::{ReaderBuilder, StringRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tickbar_core::{Error, RawRecord, RecordOrigin, Result, REQUIRED_FIELDS};

/// A directory of trade files.
#[derive(Debug, Clone)]
pub struct RecordSource {
    dir: PathBuf,
}

impl RecordSource {
    /// Create a source over the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory being read.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List every directory entry as a candidate file, sorted by name.
    ///
    /// Entries are not filtered: a subdirectory or unreadable entry shows up
    /// here and fails later, in [`read_records`].
    pub fn list_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = fs::read_dir(&self.dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        files.sort();
        Ok(files)
    }
}

/// Read every data row of one file.
///
/// `file_index` is recorded in each record's origin. Any failure (open,
/// header, malformed row) discards the whole file.
pub fn read_records(path: &Path, file_index: usize) -> Result<Vec<RawRecord>> {
    let file_error = |e: csv::Error| Error::file_access(format!("{}: {}", path.display(), e));

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(file_error)?;

    let headers = reader.headers().map_err(file_error)?.clone();
    if headers.is_empty() {
        // Empty file: no header, no rows.
        return Ok(Vec::new());
    }
    check_header(path, &headers)?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(file_error)?;
        records.push(to_raw(&headers, &record, RecordOrigin::new(file_index, row)));
    }

    Ok(records)
}

fn check_header(path: &Path, headers: &StringRecord) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|f| !headers.iter().any(|h| h == *f))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::file_access(format!(
            "{}: header is missing {}",
            path.display(),
            missing.join(", ")
        )))
    }
}

/// Short rows get empty values for the missing columns; extra values are ignored.
fn to_raw(headers: &StringRecord, record: &StringRecord, origin: RecordOrigin) -> RawRecord {
    RawRecord::new(
        origin,
        headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name, record.get(i).unwrap_or_default())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "ticks.csv",
            "Timestamp,Price,Size,Venue\n\
             2024-09-16 09:30:00.000,100.5,10,X\n\
             2024-09-16 09:30:01.000,100.6,5,Y\n",
        );

        let records = read_records(&path, 3).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp(), Some("2024-09-16 09:30:00.000"));
        assert_eq!(records[1].price(), Some("100.6"));
        assert_eq!(records[1].get("Venue"), Some("Y"));
        assert_eq!(records[1].origin, RecordOrigin::new(3, 1));
    }

    #[test]
    fn test_short_and_long_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "ragged.csv",
            "Timestamp,Price,Size\n\
             2024-09-16 09:30:00.000,100.5\n\
             2024-09-16 09:30:01.000,100.6,5,extra\n",
        );

        let records = read_records(&path, 0).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].size(), Some(""));
        assert!(records[0].has_missing_field());
        assert_eq!(records[1].len(), 3);
        assert!(!records[1].has_missing_field());
    }

    #[test]
    fn test_missing_column_fails_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "bad.csv", "Time,Price\n1,2\n");

        let err = read_records(&path, 0).unwrap_err();
        assert!(matches!(err, Error::FileAccess(_)));
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_records(&dir.path().join("absent.csv"), 0).unwrap_err();
        assert!(matches!(err, Error::FileAccess(_)));
    }

    #[test]
    fn test_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "empty.csv", "");
        assert!(read_records(&path, 0).unwrap().is_empty());
    }

    #[test]
    fn test_list_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "b.csv", "");
        write_file(dir.path(), "a.csv", "");
        fs::create_dir(dir.path().join("c")).unwrap();

        let files = RecordSource::new(dir.path()).list_files().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv", "c"]);
    }

    #[test]
    fn test_list_missing_dir() {
        let source = RecordSource::new("/nonexistent/tickbar-data");
        assert!(matches!(source.list_files(), Err(Error::Io(_))));
    }
}
