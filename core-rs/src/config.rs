/**
 * config.rs
 * Search configuration file (YAML format)
 *
 * Format:
 * ```yaml
 * apiVersion: lmss/v1
 * kind: SearchConfig
 * spec:
 *   source:
 *     path: ./LMSS.owl
 *     branch: main
 *     repoUrl: https://raw.githubusercontent.com/sali-legal/LMSS/
 *     cachePath: ~/.cache/lmss/LMSS.owl
 *     useCache: true
 *   search:
 *     defaultNumResults: 20
 *     defaultMaxDepth: null
 *     similarity: damerau-levenshtein
 *   keyConcepts:
 *     - name: Area of Law
 *       iri: http://lmss.sali.org/RSYBzf149Mi5KE0YtmpUmr
 * ```
 *
 * Every section is optional; omitted sections take the defaults below.
 * `cachePath` defaults to `$XDG_CACHE_HOME/lmss/LMSS.owl`, falling back to
 * `$HOME/.cache/lmss/LMSS.owl`.
 */

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{LmssError, Result};
use crate::index::{SimilarityKind, DEFAULT_NUM_RESULTS};

pub const API_VERSION: &str = "lmss/v1";
pub const KIND: &str = "SearchConfig";
pub const DEFAULT_REPO_URL: &str = "https://raw.githubusercontent.com/sali-legal/LMSS/";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_CONFIG_FILE: &str = ".lmss.yaml";
pub const CACHE_FILE: &str = "LMSS.owl";

/// Published LMSS top-level categories
const LMSS_KEY_CONCEPTS: [(&str, &str); 23] = [
    ("Actor / Player", "http://lmss.sali.org/R8CdMpOM0RmyrgCCvbpiLS0"),
    ("Area of Law", "http://lmss.sali.org/RSYBzf149Mi5KE0YtmpUmr"),
    ("Asset Type", "http://lmss.sali.org/RCIwc6WJi6IT7xePURxsi4T"),
    ("Communication Modality", "http://lmss.sali.org/R8qItBwG2pRMFhUq1HQEMnb"),
    ("Currency", "http://lmss.sali.org/R767niCLQVC5zIcO5WDQMSl"),
    ("Data Format", "http://lmss.sali.org/R79aItNTJQwHgR002wuX3iC"),
    ("Document / Artifact", "http://lmss.sali.org/RDt4vQCYDfY0R9fZ5FNnTbj"),
    ("Engagement Terms", "http://lmss.sali.org/R9kmGZf5FSmFdouXWQ1Nndm"),
    ("Event", "http://lmss.sali.org/R73hoH1RXYjBTYiGfolpsAF"),
    ("Forums and Venues", "http://lmss.sali.org/RBjHwNNG2ASVmasLFU42otk"),
    ("Governmental Body", "http://lmss.sali.org/RBQGborh1CfXanGZipDL0Qo"),
    ("Industry", "http://lmss.sali.org/RDIwFaFcH4KY0gwEY0QlMTp"),
    ("LMSS Type", "http://lmss.sali.org/R8uI6AZ9vSgpAdKmfGZKfTZ"),
    ("Legal Authorities", "http://lmss.sali.org/RC1CZydjfH8oiM4W3rCkma3"),
    ("Legal Entity", "http://lmss.sali.org/R7L5eLIzH0CpOUE74uJvSjL"),
    ("Location", "http://lmss.sali.org/R9aSzp9cEiBCzObnP92jYFX"),
    ("Matter Narrative", "http://lmss.sali.org/R7ReDY2v13rer1U8AyOj55L"),
    ("Matter Narrative Format", "http://lmss.sali.org/R8ONVC8pLVJC5dD4eKqCiZL"),
    ("Objectives", "http://lmss.sali.org/RlNFgB3TQfMzV26V4V7u4E"),
    ("Service", "http://lmss.sali.org/RDK1QEdQg1T8B5HQqMK2pZN"),
    ("Standards Compatibility", "http://lmss.sali.org/RB4cFSLB4xvycDlKv73dOg6"),
    ("Status", "http://lmss.sali.org/Rx69EnEj3H3TpcgTfUSoYx"),
    ("System Identifiers", "http://lmss.sali.org/R8EoZh39tWmXCkmP2Xzjl6E"),
];

/// Search configuration document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LmssConfig {
    pub api_version: String,
    pub kind: String,
    #[serde(default)]
    pub spec: Spec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Spec {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default = "default_key_concepts")]
    pub key_concepts: Vec<KeyConceptEntry>,
}

impl Default for Spec {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            search: SearchSettings::default(),
            key_concepts: default_key_concepts(),
        }
    }
}

/// Where the ontology document comes from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    /// Local ontology file; takes precedence over the repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_repo_url")]
    pub repo_url: String,
    #[serde(default = "default_cache_path", skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub use_cache: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: None,
            branch: default_branch(),
            repo_url: default_repo_url(),
            cache_path: default_cache_path(),
            use_cache: true,
        }
    }
}

/// Query defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchSettings {
    #[serde(default = "default_num_results")]
    pub default_num_results: usize,
    /// Depth limit applied when a query scopes by concept type
    #[serde(default)]
    pub default_max_depth: Option<usize>,
    #[serde(default)]
    pub similarity: SimilarityKind,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_num_results: DEFAULT_NUM_RESULTS,
            default_max_depth: None,
            similarity: SimilarityKind::default(),
        }
    }
}

/// One configured category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyConceptEntry {
    pub name: String,
    /// Known IRI; when absent the name is matched against top-level labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iri: Option<String>,
}

impl KeyConceptEntry {
    pub fn new(name: impl Into<String>, iri: Option<&str>) -> Self {
        Self {
            name: name.into(),
            iri: iri.map(str::to_string),
        }
    }
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_repo_url() -> String {
    DEFAULT_REPO_URL.to_string()
}

/// Per-user cache file for the downloaded ontology, if a cache directory is known
pub fn default_cache_path() -> Option<PathBuf> {
    cache_path_from(cache_env("XDG_CACHE_HOME"), cache_env("HOME"))
}

fn cache_env(key: &str) -> Option<OsString> {
    #[cfg(target_os = "windows")]
    let key = match key {
        "XDG_CACHE_HOME" => "LOCALAPPDATA",
        "HOME" => "USERPROFILE",
        other => other,
    };
    std::env::var_os(key).filter(|v| !v.is_empty())
}

fn cache_path_from(xdg_cache_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    xdg_cache_home
        .map(PathBuf::from)
        .or_else(|| home.map(|h| PathBuf::from(h).join(".cache")))
        .map(|dir| dir.join("lmss").join(CACHE_FILE))
}

fn default_true() -> bool {
    true
}

fn default_num_results() -> usize {
    DEFAULT_NUM_RESULTS
}

/// The 23 LMSS key concepts with their published IRIs
pub fn default_key_concepts() -> Vec<KeyConceptEntry> {
    LMSS_KEY_CONCEPTS
        .iter()
        .map(|(name, iri)| KeyConceptEntry::new(*name, Some(iri)))
        .collect()
}

impl Default for LmssConfig {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            spec: Spec::default(),
        }
    }
}

impl LmssConfig {
    /// Load a configuration file
    ///
    /// # Example
    /// ```no_run
    /// use lmss_core::LmssConfig;
    ///
    /// let config = LmssConfig::load(".lmss.yaml").unwrap();
    /// println!("{} key concepts", config.spec.key_concepts.len());
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(LmssError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let config: LmssConfig = serde_yaml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Load `path` when given, else `.lmss.yaml` in `dir` if present, else defaults
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let candidate = dir.join(DEFAULT_CONFIG_FILE);
                if candidate.exists() {
                    Self::load(candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate document header and settings
    pub fn validate(&self) -> Result<()> {
        if self.api_version != API_VERSION {
            return Err(LmssError::Config(format!(
                "Invalid apiVersion: expected '{}', got '{}'",
                API_VERSION, self.api_version
            )));
        }

        if self.kind != KIND {
            return Err(LmssError::Config(format!(
                "Invalid kind: expected '{}', got '{}'",
                KIND, self.kind
            )));
        }

        if self.spec.search.default_num_results == 0 {
            return Err(LmssError::Config(
                "spec.search.defaultNumResults must be at least 1".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for entry in &self.spec.key_concepts {
            if entry.name.trim().is_empty() {
                return Err(LmssError::Config(
                    "spec.keyConcepts entries need a name".to_string(),
                ));
            }
            if !names.insert(entry.name.as_str()) {
                return Err(LmssError::Config(format!(
                    "Duplicate key concept: {}",
                    entry.name
                )));
            }
        }

        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path.as_ref(), yaml)?;
        Ok(())
    }
}
