//! Word matcher - scans a single text file line by line
//!
//! Matching is a case-insensitive, non-overlapping literal substring
//! count: "johnny" contributes one match toward the word "john". Lines
//! are trimmed of surrounding whitespace and case-folded before matching,
//! and the target word is expected pre-folded by the session.
//!
//! Only files whose name ends in `.txt` are recognized as text files;
//! everything else is skipped with zero matches, not an error.

use crate::error::{ScanError, ScanResult};
use crate::scan::counter::OccurrenceCounter;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Suffix identifying files the matcher will read
pub const TEXT_SUFFIX: &str = ".txt";

/// Check whether a path names a recognized text file
pub fn is_text_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(TEXT_SUFFIX))
}

/// Count non-overlapping occurrences of a pre-folded word in one line
pub fn count_in_line(line: &str, folded_word: &str) -> u64 {
    line.trim().to_lowercase().matches(folded_word).count() as u64
}

/// Scan a file, adding each line's matches to the shared counter.
///
/// Increments compose associatively, so per-line atomic addition needs no
/// ordering against other files. Returns the number of matches found in
/// this file. Open or read failures abort this file only.
pub fn scan_file(
    path: &Path,
    folded_word: &str,
    counter: &OccurrenceCounter,
) -> ScanResult<u64> {
    let file = File::open(path).map_err(|e| ScanError::OpenFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let reader = BufReader::new(file);
    let mut file_total = 0u64;

    for line in reader.lines() {
        let line = line.map_err(|e| ScanError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let matches = count_in_line(&line, folded_word);
        if matches > 0 {
            counter.add(matches);
            file_total += matches;
        }
    }

    Ok(file_total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_is_text_file() {
        assert!(is_text_file(Path::new("/corpus/a.txt")));
        assert!(is_text_file(Path::new("notes.backup.txt")));
        assert!(!is_text_file(Path::new("/corpus/a.md")));
        assert!(!is_text_file(Path::new("/corpus/txt")));
        assert!(!is_text_file(Path::new("/corpus/a.txt.bak")));
    }

    #[test]
    fn test_count_is_case_insensitive() {
        assert_eq!(count_in_line("John went", "john"), 1);
        assert_eq!(count_in_line("john John JOHN", "john"), 3);
    }

    #[test]
    fn test_count_is_substring_not_whole_word() {
        // "johnny" contributes one match toward "john"
        assert_eq!(count_in_line("johnny was here", "john"), 1);
        assert_eq!(count_in_line("johnjohn", "john"), 2);
    }

    #[test]
    fn test_count_is_non_overlapping() {
        assert_eq!(count_in_line("aaaa", "aa"), 2);
        assert_eq!(count_in_line("aaa", "aa"), 1);
    }

    #[test]
    fn test_line_is_trimmed() {
        assert_eq!(count_in_line("   john   ", "john"), 1);
        assert_eq!(count_in_line("\tjohn\t", "john"), 1);
    }

    #[test]
    fn test_no_match() {
        assert_eq!(count_in_line("nothing here", "john"), 0);
        assert_eq!(count_in_line("", "john"), 0);
    }

    #[test]
    fn test_scan_file_accumulates_into_counter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "John went").unwrap();
        writeln!(file, "john John").unwrap();
        drop(file);

        let counter = OccurrenceCounter::new();
        let found = scan_file(&path, "john", &counter).unwrap();

        assert_eq!(found, 3);
        assert_eq!(counter.get(), 3);
    }

    #[test]
    fn test_scan_missing_file_is_open_error() {
        let counter = OccurrenceCounter::new();
        let err = scan_file(Path::new("/nonexistent/a.txt"), "john", &counter).unwrap_err();

        assert!(matches!(err, ScanError::OpenFailed { .. }));
        assert_eq!(counter.get(), 0);
    }
}
