//! Harvest configuration.
//!
//! Every field has a default, so an empty (or absent) config file reproduces
//! the built-in batch: ten English Wikipedia articles on robotics and agents,
//! fetched from `en.wikipedia.org` only, written to `output.jl` with raw HTML
//! under `wikipages/`.
//!
//! # Example
//!
//! ```yaml
//! pages:
//!   - https://en.wikipedia.org/wiki/Robotics
//!   - https://en.wikipedia.org/wiki/Chatbot
//! allowed_hosts: [en.wikipedia.org]
//! output_file: robotics.jl
//! page_dir: pages
//! concurrency: 2
//! ```

use crate::error::RunError;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const DEFAULT_PAGES: [&str; 10] = [
    "https://en.wikipedia.org/wiki/Robotics",
    "https://en.wikipedia.org/wiki/Robot",
    "https://en.wikipedia.org/wiki/Reinforcement_learning",
    "https://en.wikipedia.org/wiki/Robot_Operating_System",
    "https://en.wikipedia.org/wiki/Intelligent_agent",
    "https://en.wikipedia.org/wiki/Software_agent",
    "https://en.wikipedia.org/wiki/Robotic_process_automation",
    "https://en.wikipedia.org/wiki/Chatbot",
    "https://en.wikipedia.org/wiki/Applications_of_artificial_intelligence",
    "https://en.wikipedia.org/wiki/Android_(robot)",
];

/// Everything the harvester needs to run one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarvestConfig {
    /// Fully-qualified page URLs, fetched in this order (completion order may differ).
    pub pages: Vec<String>,
    /// Hosts that may be requested. Anything else is rejected before sending.
    pub allowed_hosts: Vec<String>,
    /// JSON Lines output, truncated at start.
    pub output_file: PathBuf,
    /// Directory for raw `<segment>.html` snapshots.
    pub page_dir: PathBuf,
    /// CSS selector for the element holding the article body.
    pub content_selector: String,
    /// Maximum number of requests in flight.
    pub concurrency: usize,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
    /// `User-Agent` header sent with every request. Defaults to
    /// `wiki_harvest/<version>`.
    pub user_agent: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            pages: DEFAULT_PAGES.iter().map(|p| p.to_string()).collect(),
            allowed_hosts: vec!["en.wikipedia.org".to_string()],
            output_file: PathBuf::from("output.jl"),
            page_dir: PathBuf::from("wikipages"),
            content_selector: "div#mw-content-text".to_string(),
            concurrency: 4,
            request_timeout_secs: None,
            user_agent: concat!("wiki_harvest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HarvestConfig {
    /// Load a YAML config file. Missing fields fall back to defaults.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML file
    ///
    /// # Returns
    ///
    /// The parsed configuration. It is not validated yet; see
    /// [`HarvestConfig::validate`].
    #[instrument(level = "info", skip_all)]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RunError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RunError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| RunError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), pages = config.pages.len(), "Loaded configuration");
        Ok(config)
    }

    /// Parse a YAML document. An empty document yields the defaults.
    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Check values that serde cannot, returning the compiled content selector.
    pub fn validate(&self) -> Result<Selector, RunError> {
        if self.allowed_hosts.is_empty() {
            return Err(RunError::Config(
                "allowed_hosts must name at least one host".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(RunError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }
        let selector = Selector::parse(&self.content_selector).map_err(|e| {
            RunError::Config(format!(
                "content_selector {:?} is not a valid CSS selector: {e}",
                self.content_selector
            ))
        })?;
        debug!(selector = %self.content_selector, "Validated configuration");
        Ok(selector)
    }

    /// Whether `host` is on the allow-list. Hosts compare case-insensitively.
    pub fn is_allowed_host(&self, host: &str) -> bool {
        self.allowed_hosts
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_reproduce_builtin_batch() {
        let config = HarvestConfig::default();
        assert_eq!(config.pages.len(), 10);
        assert_eq!(config.pages[0], "https://en.wikipedia.org/wiki/Robotics");
        assert_eq!(config.allowed_hosts, vec!["en.wikipedia.org"]);
        assert_eq!(config.output_file, PathBuf::from("output.jl"));
        assert_eq!(config.page_dir, PathBuf::from("wikipages"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
pages:
  - https://en.wikipedia.org/wiki/Chatbot
concurrency: 2
"#;
        let config = HarvestConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.pages, vec!["https://en.wikipedia.org/wiki/Chatbot"]);
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.content_selector, "div#mw-content-text");
        assert_eq!(config.request_timeout_secs, None);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(
            HarvestConfig::from_yaml("  \n").unwrap(),
            HarvestConfig::default()
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(HarvestConfig::from_yaml("max_depth: 3\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "output_file: robotics.jl\npage_dir: pages").unwrap();

        let config = HarvestConfig::load(file.path()).unwrap();
        assert_eq!(config.output_file, PathBuf::from("robotics.jl"));
        assert_eq!(config.page_dir, PathBuf::from("pages"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = HarvestConfig::load("/nonexistent/harvest.yaml").unwrap_err();
        assert!(matches!(err, RunError::ConfigRead { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = HarvestConfig {
            concurrency: 0,
            ..HarvestConfig::default()
        };
        assert!(matches!(config.validate(), Err(RunError::Config(_))));

        let config = HarvestConfig {
            allowed_hosts: vec![],
            ..HarvestConfig::default()
        };
        assert!(matches!(config.validate(), Err(RunError::Config(_))));

        let config = HarvestConfig {
            content_selector: "div[".to_string(),
            ..HarvestConfig::default()
        };
        assert!(matches!(config.validate(), Err(RunError::Config(_))));
    }

    #[test]
    fn test_is_allowed_host() {
        let config = HarvestConfig::default();
        assert!(config.is_allowed_host("en.wikipedia.org"));
        assert!(config.is_allowed_host("EN.Wikipedia.org"));
        assert!(!config.is_allowed_host("de.wikipedia.org"));
        assert!(!config.is_allowed_host("example.com"));
    }
}
