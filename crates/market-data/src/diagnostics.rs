//! Diagnostic capture of raw payloads that failed to parse.
//!
//! Files land under a fixed directory with fixed names, one per failure kind,
//! so the latest failure of each kind overwrites the previous one. Nothing
//! reads these files back; they exist for post-mortem inspection.

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

/// Last fetched blue-rate page when no candidate could be parsed.
pub const BLUE_RATE_PAGE: &str = "blue_rate_last_page.html";

/// P2P response body that was not JSON.
pub const P2P_MALFORMED: &str = "p2p_malformed_response.txt";

/// P2P response with no offer records.
pub const P2P_EMPTY: &str = "p2p_empty_market.json";

/// P2P response whose offers carried no usable price.
pub const P2P_UNPARSABLE: &str = "p2p_unparsable_prices.json";

/// Writes failing payloads to the diagnostics directory.
#[derive(Clone, Debug)]
pub struct DiagnosticSink {
    dir: PathBuf,
}

impl DiagnosticSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persist `payload` as `name` and return the written path.
    ///
    /// Errors are logged and swallowed: a failed capture must not hide the
    /// parse error the caller is about to return.
    pub fn capture(&self, name: &str, payload: &str) -> Option<PathBuf> {
        let path = self.dir.join(name);
        let result = fs::create_dir_all(&self.dir).and_then(|_| fs::write(&path, payload));

        match result {
            Ok(()) => {
                info!(
                    path = %path.display(),
                    bytes = payload.len(),
                    "Saved diagnostic payload"
                );
                Some(path)
            }
            Err(e) => {
                warn!(path = %path.display(), "Failed to save diagnostic payload: {}", e);
                None
            }
        }
    }
}
