//! Server configuration.
//!
//! Loaded from an optional TOML file and then overridden by command-line
//! flags (see [`crate::cli::Cli`]).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use openvto_embeddings::provider::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
use openvto_inference::ReplicateConfig;
use openvto_retrieval::CouchbaseConfig;

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub embedding: EmbeddingConfig,
    pub local: LocalConfig,
    pub couchbase: CouchbaseConfig,
    pub replicate: ReplicateSection,
}

impl ServerConfig {
    /// Read a TOML configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Which search backends can be offered with this configuration.
    pub fn availability(&self) -> Availability {
        Availability::evaluate(self)
    }
}

/// Transport the server listens on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Newline-delimited JSON on stdin/stdout.
    Stdio,
    /// JSON-RPC over `POST /mcp`.
    #[default]
    Http,
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub transport: TransportKind,
    pub listen_host: String,
    pub listen_port: u16,
    /// Log at debug level.
    pub verbose: bool,
    /// Limit on a single tool call, in seconds.
    pub tool_timeout_secs: u64,
}

impl ServerSection {
    /// Resolve the address the HTTP transport binds to.
    ///
    /// The host may be a name such as `localhost`; the first resolved
    /// address wins.
    pub async fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        let host = self.listen_host.as_str();
        tokio::net::lookup_host((host, self.listen_port))
            .await
            .with_context(|| format!("invalid listen address {host}:{}", self.listen_port))?
            .next()
            .with_context(|| format!("{host} did not resolve to any address"))
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            listen_host: "127.0.0.1".to_string(),
            listen_port: 8888,
            verbose: false,
            tool_timeout_secs: 120,
        }
    }
}

/// `[embedding]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Ollama base URL.
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            timeout_secs: 60,
        }
    }
}

/// `[local]` section: the CSV catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub csv_path: Option<PathBuf>,
    pub delimiter: char,
    pub has_header: bool,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            delimiter: ',',
            has_header: true,
        }
    }
}

/// `[replicate]` section: the try-on model and its person image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicateSection {
    #[serde(flatten)]
    pub client: ReplicateConfig,
    /// Public link to the person image garments are rendered onto.
    pub human_img: String,
    /// Open try-on results in the system browser.
    pub open_browser: bool,
}

impl Default for ReplicateSection {
    fn default() -> Self {
        Self {
            client: ReplicateConfig::default(),
            human_img: String::new(),
            open_browser: true,
        }
    }
}

/// Which features a configuration supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Catalog search and try-on.
    Local,
    /// Couchbase search and try-on.
    Couchbase,
    /// No try-on model configured; the server is unusable.
    NoReplicateKey,
    /// Try-on configured but no search backend.
    NeedsConfig,
    /// Both searches and try-on.
    All,
}

impl Availability {
    pub fn evaluate(config: &ServerConfig) -> Self {
        let replicate = &config.replicate;
        let has_replicate = replicate.client.is_complete() && !replicate.human_img.is_empty();
        let has_couchbase = config.couchbase.is_complete();
        let has_local = config.local.csv_path.is_some();

        match (has_replicate, has_couchbase, has_local) {
            (false, _, _) => Self::NoReplicateKey,
            (true, true, true) => Self::All,
            (true, true, false) => Self::Couchbase,
            (true, false, true) => Self::Local,
            (true, false, false) => Self::NeedsConfig,
        }
    }

    /// Fail for configurations the server cannot run with.
    pub fn ensure_usable(self) -> anyhow::Result<Self> {
        match self {
            Self::NoReplicateKey => anyhow::bail!(
                "the app is unusable without a Replicate API key, model version and person image link for IDM-VTON"
            ),
            Self::NeedsConfig => {
                anyhow::bail!("missing config: add either a local CSV catalog or Couchbase settings")
            }
            usable => Ok(usable),
        }
    }

    pub fn local(self) -> bool {
        matches!(self, Self::Local | Self::All)
    }

    pub fn couchbase(self) -> bool {
        matches!(self, Self::Couchbase | Self::All)
    }

    /// Tools offered, in registration order.
    pub fn tool_names(self) -> &'static [&'static str] {
        match self {
            Self::All => &["local_search", "couchbase_search", "perform_vton"],
            Self::Couchbase => &["couchbase_search", "perform_vton"],
            Self::Local => &["local_search", "perform_vton"],
            Self::NoReplicateKey | Self::NeedsConfig => &[],
        }
    }
}
