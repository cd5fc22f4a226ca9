//! Getting release artifacts onto disk
//!
//! Everything here follows one rule: if the file is already where it should
//! be, we trust it and move on, unless the user asked us to pull again.

use axoasset::{AxoClient, LocalAsset};
use camino::Utf8Path;
use tracing::debug;

use crate::errors::{InstallerError, InstallerResult};
use crate::net::{create_axoasset_client, ClientSettings};
use crate::reporter::Reporter;

/// Something that can put the bytes behind a url into a file
pub trait Fetcher {
    /// Download `url` to `dest`, overwriting whatever is there
    fn fetch(&self, url: &str, dest: &Utf8Path) -> InstallerResult<()>;
}

/// The real fetcher, backed by an [`AxoClient`][]
#[derive(Debug)]
pub struct HttpFetcher {
    client: AxoClient,
    runtime: tokio::runtime::Runtime,
}

impl HttpFetcher {
    /// Set up a client and the runtime that drives it
    pub fn new(settings: &ClientSettings) -> InstallerResult<Self> {
        let client = create_axoasset_client(settings)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|details| InstallerError::Runtime { details })?;
        Ok(Self { client, runtime })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Utf8Path) -> InstallerResult<()> {
        let bytes = self.runtime.block_on(async {
            let response = self.client.get(url).await?;
            let response = response
                .error_for_status()
                .map_err(|details| InstallerError::Download {
                    url: url.to_owned(),
                    details,
                })?;
            response
                .bytes()
                .await
                .map_err(|details| InstallerError::Download {
                    url: url.to_owned(),
                    details,
                })
        })?;

        if let Some(parent) = dest.parent() {
            if !parent.as_str().is_empty() {
                LocalAsset::create_dir_all(parent)?;
            }
        }
        std::fs::write(dest, &bytes).map_err(|details| InstallerError::DownloadWrite {
            dest: dest.to_owned(),
            details,
        })?;
        debug!("wrote {} bytes to {dest}", bytes.len());
        Ok(())
    }
}

/// How an artifact came to be on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    /// It was already there and we left it alone
    Cached,
    /// We just downloaded it
    Downloaded,
}

/// Make sure `url` is available at `dest`
///
/// No request is made if `dest` exists and `force_refresh` is false.
/// Any transfer failure is fatal; there are no retries, and a half-written
/// file is left where it is.
pub fn acquire(
    fetcher: &dyn Fetcher,
    reporter: &dyn Reporter,
    url: &str,
    dest: &Utf8Path,
    force_refresh: bool,
) -> InstallerResult<Acquisition> {
    let name = dest.file_name().unwrap_or(dest.as_str());
    if dest.exists() && !force_refresh {
        reporter.info(format!("File {name} already exists, skipping download"));
        return Ok(Acquisition::Cached);
    }

    reporter.info(format!("Downloading {url} to {dest}"));
    fetcher.fetch(url, dest)?;
    reporter.success(format!("Downloaded {name}"));
    Ok(Acquisition::Downloaded)
}
