//! Vendor SDK data-file diagnostics.
//!
//! After a full in-cloud initialization the vendor runtime drops a small
//! JSON data file describing the seat. Logging its contents right after init
//! has proven invaluable when debugging seat provisioning, so the bridge
//! reads and logs it once per successful full init. A missing file is normal
//! off-seat and is only worth a debug line.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info, warn};

/// Reads the SDK data file and logs its contents.
///
/// Never fails: the file is purely diagnostic and its absence or
/// unreadability must not affect command handling.
pub fn log_sdk_data_file(path: &Path) {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            info!(path = %path.display(), contents = contents.trim(), "sdk runtime data");
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no sdk runtime data file");
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "could not read sdk runtime data file");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_data_file_is_not_an_error() {
        // Must log and return, never panic or propagate.
        log_sdk_data_file(Path::new("/nonexistent/sdk-runtime-data.json"));
    }

    #[test]
    fn test_present_data_file_is_read() {
        let path = std::env::temp_dir().join("cloudstream-sdk-data-test.json");
        std::fs::write(&path, "{\"seat\":\"test\"}\n").unwrap();

        log_sdk_data_file(&path);

        std::fs::remove_file(&path).unwrap();
    }
}
