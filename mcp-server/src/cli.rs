//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ServerConfig, TransportKind};

/// MCP server for garment search and IDM-VTON virtual try-on.
#[derive(Debug, Default, Parser)]
#[command(name = "openvto-mcp-server", disable_version_flag = true)]
pub struct Cli {
    /// TOML configuration file. Flags override its values.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Couchbase username.
    #[arg(long, value_name = "USERNAME", help_heading = "Couchbase")]
    pub user: Option<String>,

    /// Couchbase password.
    #[arg(
        long,
        value_name = "PASSWORD",
        env = "COUCHBASE_PASSWORD",
        hide_env_values = true,
        help_heading = "Couchbase"
    )]
    pub pass: Option<String>,

    /// Couchbase hostname.
    #[arg(long, value_name = "HOSTNAME", help_heading = "Couchbase")]
    pub hostname: Option<String>,

    /// Couchbase Search Service port (default: 18094).
    #[arg(
        long,
        value_name = "PORT",
        value_parser = clap::value_parser!(u16).range(1..),
        help_heading = "Couchbase"
    )]
    pub port: Option<u16>,

    /// Couchbase bucket name.
    #[arg(long, value_name = "BUCKET", help_heading = "Couchbase")]
    pub bucket: Option<String>,

    /// Couchbase scope name.
    #[arg(long, value_name = "SCOPE", help_heading = "Couchbase")]
    pub scope: Option<String>,

    /// Couchbase search index name.
    #[arg(long, value_name = "INDEX", help_heading = "Couchbase")]
    pub search_index: Option<String>,

    /// Couchbase field holding the embedding.
    #[arg(long, value_name = "FIELD", help_heading = "Couchbase")]
    pub search_field: Option<String>,

    /// Replicate API key.
    #[arg(
        long,
        value_name = "KEY",
        env = "REPLICATE_API_TOKEN",
        hide_env_values = true,
        help_heading = "Replicate"
    )]
    pub api_key: Option<String>,

    /// Replicate model version.
    #[arg(long, value_name = "VERSION", help_heading = "Replicate")]
    pub version: Option<String>,

    /// Public URL of the person image to dress.
    #[arg(long, value_name = "URL", help_heading = "Replicate")]
    pub img_link: Option<String>,

    /// Open try-on results in the browser.
    #[arg(long, value_name = "BOOL", value_parser = parse_bool, help_heading = "Replicate")]
    pub open_browser: Option<bool>,

    /// Path to the garment CSV catalog.
    #[arg(long, value_name = "PATH", help_heading = "Local")]
    pub csv_filepath: Option<PathBuf>,

    /// Ollama base URL.
    #[arg(long, value_name = "URL", help_heading = "Embedding")]
    pub ollama_url: Option<String>,

    /// Embedding model served by Ollama.
    #[arg(long, value_name = "MODEL", help_heading = "Embedding")]
    pub embedding_model: Option<String>,

    /// Transport to serve MCP on.
    #[arg(long, value_enum, help_heading = "Server")]
    pub transport: Option<TransportKind>,

    /// Host the HTTP transport binds to.
    #[arg(long, value_name = "HOST", help_heading = "Server")]
    pub listen_host: Option<String>,

    /// Port the HTTP transport binds to.
    #[arg(long, value_name = "PORT", help_heading = "Server")]
    pub listen_port: Option<u16>,

    /// Log at debug level (0/false/no or 1/true/yes).
    #[arg(long, value_name = "BOOL", value_parser = parse_bool, help_heading = "Server")]
    pub verbose: Option<bool>,
}

impl Cli {
    /// The configuration file, if any, with flags applied on top.
    pub fn load_config(&self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    /// Override configuration values with the flags that were given.
    pub fn apply(&self, config: &mut ServerConfig) {
        let couchbase = &mut config.couchbase;
        set(&mut couchbase.username, &self.user);
        set(&mut couchbase.password, &self.pass);
        set(&mut couchbase.hostname, &self.hostname);
        set(&mut couchbase.port, &self.port);
        set(&mut couchbase.bucket, &self.bucket);
        set(&mut couchbase.scope, &self.scope);
        set(&mut couchbase.index, &self.search_index);
        set(&mut couchbase.field, &self.search_field);

        let replicate = &mut config.replicate;
        set(&mut replicate.client.api_token, &self.api_key);
        set(&mut replicate.client.version, &self.version);
        set(&mut replicate.human_img, &self.img_link);
        set(&mut replicate.open_browser, &self.open_browser);

        if let Some(path) = &self.csv_filepath {
            config.local.csv_path = Some(path.clone());
        }

        set(&mut config.embedding.base_url, &self.ollama_url);
        set(&mut config.embedding.model, &self.embedding_model);

        let server = &mut config.server;
        set(&mut server.transport, &self.transport);
        set(&mut server.listen_host, &self.listen_host);
        set(&mut server.listen_port, &self.listen_port);
        set(&mut server.verbose, &self.verbose);
    }
}

fn set<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

/// Parse `true/1/yes` or `false/0/no`.
pub fn parse_bool(value: &str) -> Result<bool, String> {
    match value {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(format!("invalid boolean {other:?}, expected true/1/yes or false/0/no")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Availability;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("openvto-mcp-server").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("yes"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = parse(&[
            "--user",
            "admin",
            "--pass",
            "secret",
            "--hostname",
            "cb.example.com",
            "--port",
            "8094",
            "--bucket",
            "fashion",
            "--scope",
            "catalog",
            "--search-index",
            "garments",
            "--api-key",
            "r8_token",
            "--version",
            "abc123",
            "--img-link",
            "https://x/person.png",
            "--csv-filepath",
            "garments.csv",
            "--verbose",
            "1",
            "--transport",
            "stdio",
        ]);

        let mut config = ServerConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.couchbase.username, "admin");
        assert_eq!(config.couchbase.port, 8094);
        assert_eq!(config.couchbase.index, "garments");
        assert_eq!(config.couchbase.field, "embedding_vector");
        assert_eq!(config.replicate.client.version, "abc123");
        assert_eq!(config.replicate.human_img, "https://x/person.png");
        assert_eq!(config.local.csv_path, Some(PathBuf::from("garments.csv")));
        assert!(config.server.verbose);
        assert_eq!(config.server.transport, TransportKind::Stdio);
        assert_eq!(config.availability(), Availability::All);
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let mut config = ServerConfig::default();
        config.server.listen_port = 9000;

        Cli::default().apply(&mut config);
        assert_eq!(config.server.listen_port, 9000);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let name = std::iter::once("openvto-mcp-server");
        assert!(Cli::try_parse_from(name.clone().chain(["--verbose", "maybe"])).is_err());
        assert!(Cli::try_parse_from(name.clone().chain(["--port", "0"])).is_err());
        assert!(Cli::try_parse_from(name.chain(["--transport", "sse"])).is_err());
    }
}
