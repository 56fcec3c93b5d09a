/**
 * loader.rs
 * Ontology acquisition: local file, cache file, or the published LMSS artifact
 *
 * Resolution order:
 * 1. `source.path` when set
 * 2. `source.cachePath` when `useCache` is on and the file exists
 * 3. `{repoUrl}/{branch}/LMSS.owl`, written back to the cache when enabled
 */

use oxigraph::io::RdfFormat;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::SourceConfig;
use crate::errors::{LmssError, Result};
use crate::ontology::{format_for_path, OxigraphSource};

pub const ARTIFACT_NAME: &str = "LMSS.owl";

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Where the loaded bytes came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Path(PathBuf),
    Cache(PathBuf),
    Remote(String),
}

/// URL of the ontology artifact for a branch
///
/// ```
/// use lmss_core::loader::artifact_url;
///
/// assert_eq!(
///     artifact_url("https://raw.githubusercontent.com/sali-legal/LMSS/", "/main"),
///     "https://raw.githubusercontent.com/sali-legal/LMSS/main/LMSS.owl"
/// );
/// ```
pub fn artifact_url(repo_url: &str, branch: &str) -> String {
    format!(
        "{}/{}/{}",
        repo_url.trim_end_matches('/'),
        branch.trim_start_matches('/'),
        ARTIFACT_NAME
    )
}

/// Download the ontology artifact
pub async fn fetch_owl(client: &reqwest::Client, repo_url: &str, branch: &str) -> Result<Vec<u8>> {
    let url = artifact_url(repo_url, branch);
    info!(url = %url, "fetching ontology");

    let response = client.get(&url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;

    if bytes.is_empty() {
        return Err(LmssError::Fetch(format!("Empty response from {}", url)));
    }

    debug!(url = %url, bytes = bytes.len(), "fetched ontology");
    Ok(bytes.to_vec())
}

pub struct OntologyLoader {
    source: SourceConfig,
    client: reqwest::Client,
}

impl OntologyLoader {
    pub fn new(source: SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { source, client })
    }

    pub fn source(&self) -> &SourceConfig {
        &self.source
    }

    /// Raw ontology bytes and their origin
    pub async fn load_bytes(&self) -> Result<(Vec<u8>, Origin)> {
        if let Some(path) = &self.source.path {
            let data = read_file(path).await?;
            return Ok((data, Origin::Path(path.clone())));
        }

        let cache = self.source.cache_path.as_ref().filter(|_| self.source.use_cache);

        if let Some(cache) = cache {
            if cache.exists() {
                debug!(path = %cache.display(), "using cached ontology");
                let data = read_file(cache).await?;
                return Ok((data, Origin::Cache(cache.clone())));
            }
        }

        let data = fetch_owl(&self.client, &self.source.repo_url, &self.source.branch).await?;

        if let Some(cache) = cache {
            // a failed cache write does not fail the load
            if let Err(e) = write_cache(cache, &data).await {
                warn!(path = %cache.display(), error = %e, "could not write ontology cache");
            }
        }

        Ok((data, Origin::Remote(artifact_url(&self.source.repo_url, &self.source.branch))))
    }

    /// Load and parse into a statement source
    pub async fn load(&self) -> Result<OxigraphSource> {
        let (data, origin) = self.load_bytes().await?;

        let format = match &origin {
            Origin::Path(path) => format_for_path(path),
            Origin::Cache(_) | Origin::Remote(_) => RdfFormat::RdfXml,
        };

        info!(origin = ?origin, bytes = data.len(), "loaded ontology");
        OxigraphSource::from_bytes(&data, format)
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| {
        LmssError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })
}

async fn write_cache(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, data).await?;
    debug!(path = %path.display(), "wrote ontology cache");
    Ok(())
}
