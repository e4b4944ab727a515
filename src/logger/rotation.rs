//! Rotation file naming, discovery and pruning.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::error::LogIoError;

static SEQUENCE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-(\d{4})\.json$").expect("Invalid rotation suffix regex"));

/// `<dir>/<base>-<NNNN>.json`
pub fn rotated_path(dir: &Path, base: &str, sequence: u32) -> PathBuf {
    dir.join(format!("{}-{:04}.json", base, sequence))
}

/// Existing rotation files of `base`, sorted by sequence number.
pub fn scan_rotations(dir: &Path, base: &str) -> Result<Vec<(u32, PathBuf)>, LogIoError> {
    let prefix = format!("{}-", base);
    let entries = std::fs::read_dir(dir).map_err(|e| LogIoError::new("scan", dir, e))?;

    let mut found = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.starts_with(&prefix) {
            continue;
        }
        // `<base>-NNNN.json` exactly; longer names belong to other bases
        let Some(caps) = SEQUENCE_SUFFIX.captures(&name[base.len()..]) else {
            continue;
        };
        if let Ok(sequence) = caps[1].parse::<u32>() {
            found.push((sequence, entry.path()));
        }
    }
    found.sort_by_key(|(sequence, _)| *sequence);
    Ok(found)
}

/// Highest sequence a four-digit rotation name can carry.
pub const MAX_SEQUENCE: u32 = 9999;

/// Next unused sequence number, or `None` once `MAX_SEQUENCE` is taken.
pub fn next_sequence(existing: &[(u32, PathBuf)]) -> Option<u32> {
    match existing.last() {
        Some((sequence, _)) => sequence.checked_add(1).filter(|next| *next <= MAX_SEQUENCE),
        None => Some(0),
    }
}

/// Delete the oldest files so that, with one more rotation, at most
/// `retain` remain. Failures are collected, not fatal.
pub fn prune_oldest(existing: &[(u32, PathBuf)], retain: usize) -> Vec<LogIoError> {
    let excess = (existing.len() + 1).saturating_sub(retain.max(1));
    existing
        .iter()
        .take(excess)
        .filter_map(|(_, path)| {
            std::fs::remove_file(path)
                .err()
                .map(|e| LogIoError::new("prune", path, e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "[]").unwrap();
    }

    #[test]
    fn test_rotated_path_is_zero_padded() {
        let path = rotated_path(Path::new("/logs"), "log-20240501-120000", 7);
        assert_eq!(path, PathBuf::from("/logs/log-20240501-120000-0007.json"));
    }

    #[test]
    fn test_scan_ignores_other_files() {
        let dir = TempDir::new().unwrap();
        let base = "log-20240501-120000";
        touch(dir.path(), "log-20240501-120000.json");
        touch(dir.path(), "log-20240501-120000-0002.json");
        touch(dir.path(), "log-20240501-120000-0000.json");
        touch(dir.path(), "log-20240501-120000-abcd.json");
        touch(dir.path(), "log-20240502-080000-0005.json");
        touch(dir.path(), "log-20240501-120000-0001.txt");

        let found = scan_rotations(dir.path(), base).unwrap();
        let sequences: Vec<u32> = found.iter().map(|(s, _)| *s).collect();
        assert_eq!(sequences, vec![0, 2]);
        assert_eq!(next_sequence(&found), Some(3));
    }

    #[test]
    fn test_next_sequence_starts_at_zero() {
        assert_eq!(next_sequence(&[]), Some(0));
    }

    #[test]
    fn test_sequence_stops_at_four_digits() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b-9999.json");
        touch(dir.path(), "b-4294967295.json");
        touch(dir.path(), "b-10000.json");

        let found = scan_rotations(dir.path(), "b").unwrap();
        let sequences: Vec<u32> = found.iter().map(|(s, _)| *s).collect();
        assert_eq!(sequences, vec![9999]);
        assert_eq!(next_sequence(&found), None);
    }

    #[test]
    fn test_prune_keeps_room_for_one_more() {
        let dir = TempDir::new().unwrap();
        let base = "b";
        for name in ["b-0000.json", "b-0001.json", "b-0002.json"] {
            touch(dir.path(), name);
        }
        let found = scan_rotations(dir.path(), base).unwrap();
        let errors = prune_oldest(&found, 2);
        assert!(errors.is_empty());

        let left: Vec<u32> = scan_rotations(dir.path(), base)
            .unwrap()
            .iter()
            .map(|(s, _)| *s)
            .collect();
        assert_eq!(left, vec![2]);
    }

    #[test]
    fn test_prune_below_limit_is_noop() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b-0000.json");
        let found = scan_rotations(dir.path(), "b").unwrap();
        assert!(prune_oldest(&found, 5).is_empty());
        assert_eq!(scan_rotations(dir.path(), "b").unwrap().len(), 1);
    }
}
