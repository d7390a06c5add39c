use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

/// Removes stale temporary files left behind by interrupted writes.
///
/// Files younger than the threshold are kept: they may belong to a write
/// still in flight in another process sharing the root.
pub(crate) fn purge_tmp(root: &Path) {
    let now = SystemTime::now();
    let threshold = Duration::from_secs(300);

    let (removed, failed) = remove_stale(root, now, threshold);
    if removed > 0 || failed > 0 {
        info!(removed, failed, "Cleaned up temporary files");
    }
}

fn remove_stale(root: &Path, now: SystemTime, threshold: Duration) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %root.display(), error = %err, "Temp purge scan failed");
            return (removed, failed);
        },
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if is_tmp(&path) && is_stale(&path, now, threshold) {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!(p = %path.display(), err = %e, "IO fail");
                    failed += 1;
                },
            }
        }
    }

    (removed, failed)
}

fn is_tmp(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    path.file_name().and_then(|name| name.to_str()).map_or(false, |name| name.contains(".swbtmp."))
}

fn is_stale(path: &Path, now: SystemTime, threshold: Duration) -> bool {
    fs::metadata(path)
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .map_or(true, |age| age > threshold)
}
