use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::types::{MockSheet, ResultsFile, StudentResult, FILE_VERSION};
use crate::error::ResultsError;

/// Load a results file.
///
/// Fails if the file cannot be read, is not valid JSON, or has an
/// unsupported version.
pub fn load_results_file(path: &Path) -> Result<ResultsFile, ResultsError> {
    let file: ResultsFile = read_json(path)?;
    check_version(path, file.version)?;
    tracing::debug!(path = %path.display(), students = file.results.len(), "loaded results file");
    Ok(file)
}

/// Load a mock-exam sheet.
pub fn load_mock_sheet(path: &Path) -> Result<MockSheet, ResultsError> {
    let sheet: MockSheet = read_json(path)?;
    check_version(path, sheet.version)?;
    tracing::debug!(path = %path.display(), entries = sheet.entries.len(), "loaded mock sheet");
    Ok(sheet)
}

/// Expand each argument as a glob pattern. A pattern that matches nothing is
/// an error, so a typo doesn't silently drop a class.
pub fn expand_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>, ResultsError> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let entries = glob::glob(pattern).map_err(|source| ResultsError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut matched = false;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    matched = true;
                    if !paths.contains(&path) {
                        paths.push(path);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    return Err(ResultsError::Io {
                        path: e.path().to_path_buf(),
                        source: e.into_error(),
                    })
                }
            }
        }
        if !matched {
            return Err(ResultsError::NoMatches(pattern.to_string()));
        }
    }
    Ok(paths)
}

/// Load every student result from all files matching `patterns`.
pub fn load_results<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<StudentResult>, ResultsError> {
    let mut results = Vec::new();
    for path in expand_patterns(patterns)? {
        results.extend(load_results_file(&path)?.results);
    }
    Ok(results)
}

/// Save a report as pretty JSON atomically
///
/// Uses atomic-write-file so a half-written report never replaces a good one.
pub fn save_json_report<T: Serialize>(path: &Path, report: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, report).context("Failed to serialize report")?;

    file.commit()
        .with_context(|| format!("Failed to save report to {}", path.display()))?;

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ResultsError> {
    let file = File::open(path).map_err(|source| ResultsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ResultsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn check_version(path: &Path, version: u32) -> Result<(), ResultsError> {
    if version != FILE_VERSION {
        return Err(ResultsError::UnsupportedVersion {
            path: path.to_path_buf(),
            version,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RESULTS: &str = r#"{
        "version": 1,
        "results": [
            {
                "student_id": "s1",
                "student_name": "Ama",
                "class_id": "jhs1",
                "academic_year": "2025/2026",
                "term": "1",
                "subjects": [{"subject": "mathematics", "ca1_score": 20, "exam_score": 60}]
            }
        ]
    }"#;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_results_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "jhs1.json", RESULTS);
        let file = load_results_file(&path).unwrap();
        assert_eq!(file.results.len(), 1);
        assert_eq!(file.results[0].subjects[0].subject, "mathematics");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_results_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ResultsError::Io { .. }));
    }

    #[test]
    fn test_unsupported_version() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "v2.json", r#"{"version": 2, "results": []}"#);
        let err = load_results_file(&path).unwrap_err();
        assert!(matches!(err, ResultsError::UnsupportedVersion { version: 2, .. }));
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.json", "{ not json");
        assert!(matches!(
            load_results_file(&path).unwrap_err(),
            ResultsError::Parse { .. }
        ));
    }

    #[test]
    fn test_unknown_subject_key_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "typo.json", &RESULTS.replace("\"ca1_score\"", "\"ca_score\""));
        let err = load_results_file(&path).unwrap_err();
        assert!(matches!(err, ResultsError::Parse { .. }));
        assert!(err.to_string().contains("ca_score"));
    }

    #[test]
    fn test_glob_loads_all_matches_once() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.json", RESULTS);
        write(&dir, "b.json", RESULTS);
        let all = dir.path().join("*.json").display().to_string();
        let one = dir.path().join("a.json").display().to_string();

        let paths = expand_patterns(&[all.clone(), one]).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(load_results(&[all]).unwrap().len(), 2);
    }

    #[test]
    fn test_glob_without_matches() {
        let dir = TempDir::new().unwrap();
        let pattern = dir.path().join("*.json").display().to_string();
        assert!(matches!(
            expand_patterns(&[pattern]).unwrap_err(),
            ResultsError::NoMatches(_)
        ));
    }

    #[test]
    fn test_save_report_creates_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("report.json");
        save_json_report(&path, &serde_json::json!({"ok": true})).unwrap();
        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["ok"], true);
    }
}
