//! On-disk state: the last result batch (parcel-framed binary) and the set
//! of visited question ids (JSON). Both live in the app data dir and are
//! written atomically so a crash mid-write never leaves a corrupt file
//! behind. Unreadable files are treated as absent, not fatal.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tauri::Manager;

use crate::parcel;
use crate::types::QuestionRow;

const RESULTS_FILE: &str = "last-results.bin";
const VISITED_FILE: &str = "visited.json";

fn data_dir(app: &tauri::AppHandle) -> PathBuf {
    app.path()
        .app_data_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("stackoverflow-searcher")
}

pub fn results_path(app: &tauri::AppHandle) -> PathBuf {
    data_dir(app).join(RESULTS_FILE)
}

pub fn visited_path(app: &tauri::AppHandle) -> PathBuf {
    data_dir(app).join(VISITED_FILE)
}

/// Persist the current result batch.
pub fn save_batch(path: &Path, rows: &[QuestionRow]) -> Result<()> {
    write_atomic(path, &parcel::encode_batch(rows))
}

/// Load the last persisted batch. Missing, corrupt, or version-mismatched
/// files read as an empty batch.
pub fn load_batch(path: &Path) -> Vec<QuestionRow> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(_) => return Vec::new(),
    };
    match parcel::decode_batch(&bytes) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!("discarding unreadable results file: {e}");
            Vec::new()
        }
    }
}

/// Persist the visited-id set. Ids are sorted so the file is stable across
/// saves of the same set.
pub fn save_visited(path: &Path, visited: &HashSet<i64>) -> Result<()> {
    let mut ids: Vec<i64> = visited.iter().copied().collect();
    ids.sort_unstable();
    write_atomic(path, &serde_json::to_vec(&ids)?)
}

pub fn load_visited(path: &Path) -> HashSet<i64> {
    let Ok(bytes) = std::fs::read(path) else {
        return HashSet::new();
    };
    match serde_json::from_slice::<Vec<i64>>(&bytes) {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => {
            tracing::warn!("discarding unreadable visited file: {e}");
            HashSet::new()
        }
    }
}

/// Write to a temp file alongside the target, then atomically rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, bytes)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn batch_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last-results.bin");
        let rows = vec![
            QuestionRow::new().title("first").question_id(Some(1)),
            QuestionRow::new().title("second").visited(None),
        ];
        save_batch(&path, &rows).unwrap();
        assert_eq!(load_batch(&path), rows);
    }

    #[test]
    fn missing_or_corrupt_batch_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last-results.bin");
        assert!(load_batch(&path).is_empty());

        std::fs::write(&path, b"not a parcel").unwrap();
        assert!(load_batch(&path).is_empty());
    }

    #[test]
    fn visited_set_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visited.json");
        let visited: HashSet<i64> = [3, 1, 2].into_iter().collect();
        save_visited(&path, &visited).unwrap();
        assert_eq!(load_visited(&path), visited);
    }

    #[test]
    fn corrupt_visited_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visited.json");
        std::fs::write(&path, b"{broken").unwrap();
        assert!(load_visited(&path).is_empty());
    }
}
