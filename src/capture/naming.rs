//! Timestamped export file names.

use std::path::{Path, PathBuf};

pub const EXPORT_PREFIX: &str = "dimensions";

pub fn unix_millis_now() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// `dimensions-<unix-millis>.<ext>`
pub fn export_file_name(unix_millis: u128, ext: &str) -> String {
    format!("{EXPORT_PREFIX}-{unix_millis}.{ext}")
}

/// First free path in `dir` for the timestamp; `-1`, `-2`, ... is appended on collision.
pub fn unique_export_path(dir: &Path, unix_millis: u128, ext: &str) -> PathBuf {
    let first = dir.join(export_file_name(unix_millis, ext));
    if !first.exists() {
        return first;
    }
    (1u32..)
        .map(|n| dir.join(format!("{EXPORT_PREFIX}-{unix_millis}-{n}.{ext}")))
        .find(|p| !p.exists())
        .unwrap_or(first)
}
