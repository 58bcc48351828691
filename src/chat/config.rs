//! Configuration types for the chat application.
//!
//! Settings come from two places: the user's JSON configuration file
//! (`~/.v2/config.json`) and command-line flags parsed with `arrrg`. Flags
//! win over the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use arrrg_derive::CommandLine;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{KnownModel, Model};

/// Default ratio between completion and prompt token prices.
pub const DEFAULT_OUTPUT_COST_RATIO: f64 = 4.0;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const CONFIG_DIR: &str = ".v2";
const CONFIG_FILE: &str = "config.json";

/// Command-line arguments for the vtwo chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Path of the configuration file.
    #[arrrg(optional, "Config file (default: ~/.v2/config.json)", "PATH")]
    pub config: Option<String>,

    /// Model to use for chat.
    #[arrrg(optional, "Model to use (overrides the config file)", "MODEL")]
    pub model: Option<String>,

    /// Per-request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (overrides the config file)", "SECS")]
    pub timeout: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

///////////////////////////////////////// UserConfig ///////////////////////////////////////

/// The `api_config` section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,

    /// Bearer token; empty means "use the environment".
    #[serde(default)]
    pub api_key: String,

    /// Model name sent with every request.
    pub model: String,

    /// Completion token price as a multiple of the prompt token price.
    #[serde(default = "default_output_cost_ratio")]
    pub output_cost_ratio: f64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// The `notes_config` section of the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotesConfig {
    /// Root of the notes tree; daily notes live in `<base_path>/Daily`.
    #[serde(default)]
    pub base_path: PathBuf,
}

/// The configuration file as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserConfig {
    #[serde(rename = "api_config")]
    pub api: ApiConfig,

    #[serde(rename = "notes_config", default)]
    pub notes: NotesConfig,
}

fn default_output_cost_ratio() -> f64 {
    DEFAULT_OUTPUT_COST_RATIO
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl UserConfig {
    /// `~/.v2/config.json`.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::config("could not determine home directory", None))?;
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Reads and parses the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|err| {
            Error::config(
                format!("failed to read configuration file: {err}"),
                Some(path),
            )
        })?;
        Self::parse(&contents, path)
    }

    /// Reads the configuration from [`UserConfig::default_path`].
    pub fn load_default() -> Result<Self> {
        Self::load(&Self::default_path()?)
    }

    /// Loads `path` if given, or the default location otherwise.
    pub fn load_from(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(Path::new(path)),
            None => Self::load_default(),
        }
    }

    fn parse(contents: &str, path: &Path) -> Result<Self> {
        let config: Self = serde_json::from_str(contents).map_err(|err| {
            Error::config(format!("invalid configuration: {err}"), Some(path))
        })?;
        if config.api.base_url.trim().is_empty() {
            return Err(Error::config("api_config.base_url is empty", Some(path)));
        }
        if config.api.model.trim().is_empty() {
            return Err(Error::config("api_config.model is empty", Some(path)));
        }
        if !config.api.output_cost_ratio.is_finite() || config.api.output_cost_ratio < 0.0 {
            return Err(Error::config(
                "api_config.output_cost_ratio must be a non-negative number",
                Some(path),
            ));
        }
        Ok(config)
    }
}

///////////////////////////////////////// ChatConfig ///////////////////////////////////////

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after merging the
/// configuration file with command-line arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// Base URL of the API; `None` uses the client default.
    pub base_url: Option<String>,

    /// API key; `None` reads it from the environment.
    pub api_key: Option<String>,

    /// Completion token price as a multiple of the prompt token price.
    pub output_cost_ratio: f64,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gpt-4o-mini
    /// - Output cost ratio: 4.0
    /// - Timeout: 60 seconds
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: Model::Known(KnownModel::Gpt4oMini),
            base_url: None,
            api_key: None,
            output_cost_ratio: DEFAULT_OUTPUT_COST_RATIO,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_color: true,
        }
    }

    /// Builds the session configuration from the configuration file.
    pub fn from_user_config(config: &UserConfig) -> Self {
        let api = &config.api;
        Self {
            model: Model::from(api.model.as_str()),
            base_url: Some(api.base_url.clone()),
            api_key: Some(api.api_key.clone()).filter(|key| !key.is_empty()),
            output_cost_ratio: api.output_cost_ratio,
            timeout: Duration::from_secs(api.timeout),
            use_color: true,
        }
    }

    /// Applies command-line overrides.
    pub fn apply_args(mut self, args: &ChatArgs) -> Self {
        if let Some(model) = args.model.as_deref() {
            self.model = Model::from(model);
        }
        if let Some(timeout) = args.timeout {
            self.timeout = Duration::from_secs(timeout);
        }
        if args.no_color {
            self.use_color = false;
        }
        self
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the completion to prompt price ratio.
    pub fn with_output_cost_ratio(mut self, ratio: f64) -> Self {
        self.output_cost_ratio = ratio;
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}
