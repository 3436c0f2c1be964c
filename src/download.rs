//! Fetch of the default registry source.
//!
//! A single blocking GET; any transport error or non-success status aborts the run. There is no
//! retry.

use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

use crate::error::{DownloadFailure, RegistryError, RegistryResult};
use crate::observability::{PipelineObserver, Severity, Stage, StageContext, StageStats, report_outcome};

/// Published journal list used when no local source is given.
pub const DEFAULT_SOURCE_URL: &str = "https://www.gov.pl/attachment/c2510527-171a-451e-b3c4-74ea5a5c6c94";

/// File name the default source is saved under, inside the system temp directory.
pub const DOWNLOAD_FILE_NAME: &str = "original.xlsx";

const USER_AGENT_VALUE: &str = concat!("journal-registry/", env!("CARGO_PKG_VERSION"));

/// Where [`download`] stores the default source.
pub fn default_download_path() -> PathBuf {
    std::env::temp_dir().join(DOWNLOAD_FILE_NAME)
}

/// Download `url` into `path`, overwriting it. Returns the number of bytes written.
pub fn download(
    url: &str,
    path: &Path,
    observer: &dyn PipelineObserver,
    alert_at_or_above: Severity,
) -> RegistryResult<u64> {
    let ctx = StageContext::new(Stage::Download, url);
    observer.on_note(
        &ctx,
        Severity::Info,
        &format!("downloading to {}", path.display()),
    );

    let result = fetch(url, path).map_err(|source| RegistryError::Download {
        url: url.to_string(),
        source,
    });
    report_outcome(observer, &ctx, alert_at_or_above, &result, |_| StageStats::default());
    result
}

fn fetch(url: &str, path: &Path) -> Result<u64, DownloadFailure> {
    let client = Client::builder().build()?;
    let response = client.get(url).header(USER_AGENT, USER_AGENT_VALUE).send()?;

    if !response.status().is_success() {
        return Err(DownloadFailure::Status(response.status().as_u16()));
    }

    let body = response.bytes()?;
    fs::write(path, &body)?;
    Ok(body.len() as u64)
}
