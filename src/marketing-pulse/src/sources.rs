//! Resolves the four input paths and reads whichever files exist.

use pulse_core::config::InputConfig;
use pulse_core::PulseResult;
use pulse_ingest::{Source, SourceBundle};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub google: PathBuf,
    pub facebook: PathBuf,
    pub tiktok: PathBuf,
    pub business: PathBuf,
}

impl SourcePaths {
    pub fn from_config(inputs: &InputConfig) -> Self {
        Self {
            google: PathBuf::from(&inputs.google),
            facebook: PathBuf::from(&inputs.facebook),
            tiktok: PathBuf::from(&inputs.tiktok),
            business: PathBuf::from(&inputs.business),
        }
    }

    /// Read every file that exists. A path with no file behind it leaves
    /// that source absent; other read failures are errors.
    pub fn load_bundle(&self) -> PulseResult<SourceBundle> {
        Ok(SourceBundle {
            google: read_if_present(&self.google)?,
            facebook: read_if_present(&self.facebook)?,
            tiktok: read_if_present(&self.tiktok)?,
            business: read_if_present(&self.business)?,
        })
    }
}

fn read_if_present(path: &Path) -> PulseResult<Option<Source>> {
    if !path.is_file() {
        debug!(path = %path.display(), "Source not present");
        return Ok(None);
    }
    Source::from_path(path).map(Some)
}
