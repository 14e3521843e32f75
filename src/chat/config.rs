//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg`, an optional YAML
//! configuration file, and the resolved [`ChatConfig`].  Values come from the
//! defaults, then the file, then the command line.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use arrrg_derive::CommandLine;
use serde::{Deserialize, Serialize};

use super::prompt::SYSTEM_INSTRUCTION;
use crate::client::{DEFAULT_API_KEY_VAR, GeminiClient};
use crate::client_logger::StderrLogger;
use crate::theme::ThemeCycle;
use crate::types::Model;
use crate::{Error, Result};

/// Default connect and response-header timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default theme cycle.
const DEFAULT_THEMES: [&str; 2] = ["dark", "high-contrast"];

/// Command-line arguments for the edu-assistant-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gemini-2.5-flash)", "MODEL")]
    pub model: Option<String>,

    /// System instruction replacing the built-in assistant persona.
    #[arrrg(optional, "System instruction for the session", "PROMPT")]
    pub system: Option<String>,

    /// Environment variable holding the API key.
    #[arrrg(optional, "Variable holding the API key (default: GEMINI_API_KEY)", "VAR")]
    pub api_key_var: Option<String>,

    /// Base URL of the model service.
    #[arrrg(optional, "Base URL of the model service", "URL")]
    pub base_url: Option<String>,

    /// Comma-separated theme cycle.
    #[arrrg(optional, "Theme cycle (default: dark,high-contrast)", "THEMES")]
    pub themes: Option<String>,

    /// YAML configuration file.
    #[arrrg(optional, "YAML configuration file", "PATH")]
    pub config: Option<String>,

    /// Seconds to wait for a connection and the response headers.
    #[arrrg(optional, "Seconds to wait for a response to start (default: 60)", "SECS")]
    pub timeout_secs: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Log requests and streamed payloads to stderr.
    #[arrrg(flag, "Log requests and responses to stderr")]
    pub verbose: bool,
}

/// The YAML configuration file.  Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub model: Option<String>,
    pub system_instruction: Option<String>,
    pub api_key_var: Option<String>,
    pub base_url: Option<String>,
    pub themes: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
    pub use_color: Option<bool>,
    pub verbose: Option<bool>,
}

impl ConfigFile {
    /// Parses a configuration document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("cannot read config file {}", path.display()), e)
        })?;
        Self::from_yaml(&yaml).map_err(|e| {
            Error::validation(
                format!("invalid config file {}: {e}", path.display()),
                Some("config".to_string()),
            )
        })
    }
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after merging the
/// config file and command-line arguments over the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// Instruction the session is seeded with.
    pub system_instruction: String,

    /// Environment variable the API key is read from.
    pub api_key_var: String,

    /// Base URL override; `None` uses the public endpoint.
    pub base_url: Option<String>,

    /// Seconds to wait for a connection and the response headers.  A reply
    /// that has started streaming is never cut off.
    pub timeout_secs: u64,

    /// Theme names in cycle order.
    pub themes: Vec<String>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to log traffic to stderr.
    pub verbose: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-2.5-flash
    /// - System instruction: the assistant persona
    /// - Key variable: GEMINI_API_KEY
    /// - Themes: dark, high-contrast
    /// - Timeout: 60 seconds
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            api_key_var: DEFAULT_API_KEY_VAR.to_string(),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            themes: DEFAULT_THEMES.iter().map(|s| s.to_string()).collect(),
            use_color: true,
            verbose: false,
        }
    }

    /// Resolves arguments against the config file they name, if any.
    pub fn from_args(args: ChatArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        let config = Self::new().with_file(file).with_args(args);
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings no request could succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::validation(
                "timeout must be at least one second",
                Some("timeout_secs".to_string()),
            ));
        }
        Ok(())
    }

    /// Applies the values set in `file`.
    pub fn with_file(mut self, file: ConfigFile) -> Self {
        if let Some(model) = file.model {
            self = self.with_model(parse_model(model));
        }
        if let Some(system) = file.system_instruction {
            self.system_instruction = system;
        }
        if let Some(var) = file.api_key_var {
            self.api_key_var = var;
        }
        if file.base_url.is_some() {
            self.base_url = file.base_url;
        }
        if let Some(themes) = file.themes {
            self.themes = themes;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout_secs = secs;
        }
        if let Some(use_color) = file.use_color {
            self.use_color = use_color;
        }
        if let Some(verbose) = file.verbose {
            self.verbose = verbose;
        }
        self
    }

    /// Applies the values set on the command line.
    pub fn with_args(mut self, args: ChatArgs) -> Self {
        if let Some(model) = args.model {
            self = self.with_model(parse_model(model));
        }
        if let Some(system) = args.system {
            self.system_instruction = system;
        }
        if let Some(var) = args.api_key_var {
            self.api_key_var = var;
        }
        if args.base_url.is_some() {
            self.base_url = args.base_url;
        }
        if let Some(themes) = args.themes {
            self.themes = split_themes(&themes);
        }
        if let Some(secs) = args.timeout_secs {
            self.timeout_secs = secs;
        }
        if args.no_color {
            self.use_color = false;
        }
        if args.verbose {
            self.verbose = true;
        }
        self
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    /// Sets the theme cycle by name.
    pub fn with_themes(mut self, themes: Vec<String>) -> Self {
        self.themes = themes;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// The connect and response-header timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Builds the configured theme cycle.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown theme or an empty list.
    pub fn theme_cycle(&self) -> Result<ThemeCycle> {
        ThemeCycle::from_names(&self.themes)
    }

    /// Builds a client from the configured credential variable and endpoint.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the credential is missing or empty.
    pub fn build_client(&self) -> Result<GeminiClient> {
        let client = GeminiClient::with_options(
            None,
            &self.api_key_var,
            self.base_url.as_deref(),
            Some(self.timeout()),
        )?;
        let logger = if self.verbose {
            StderrLogger::verbose()
        } else {
            StderrLogger::errors_only()
        };
        Ok(client.with_logger(Arc::new(logger)))
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_model(model: String) -> Model {
    model.parse::<Model>().unwrap_or(Model::Custom(model))
}

fn split_themes(themes: &str) -> Vec<String> {
    themes
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Flash));
        assert_eq!(config.system_instruction, SYSTEM_INSTRUCTION);
        assert_eq!(config.api_key_var, "GEMINI_API_KEY");
        assert_eq!(config.themes, vec!["dark", "high-contrast"]);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(config.base_url.is_none());
        assert!(config.use_color);
        assert!(!config.verbose);
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from_args(ChatArgs::default()).unwrap();
        assert_eq!(config, ChatConfig::new());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("gemini-2.5-pro".to_string()),
            system: Some("You are terse.".to_string()),
            themes: Some("light, dark ,high-contrast".to_string()),
            timeout_secs: Some(5),
            no_color: true,
            verbose: true,
            ..ChatArgs::default()
        };
        let config = ChatConfig::from_args(args).unwrap();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(config.system_instruction, "You are terse.");
        assert_eq!(config.themes, vec!["light", "dark", "high-contrast"]);
        assert_eq!(config.timeout_secs, 5);
        assert!(!config.use_color);
        assert!(config.verbose);
    }

    #[test]
    fn unknown_model_becomes_custom() {
        let config = ChatConfig::new().with_args(ChatArgs {
            model: Some("gemini-experimental".to_string()),
            ..ChatArgs::default()
        });
        assert_eq!(
            config.model,
            Model::Custom("gemini-experimental".to_string())
        );
    }

    #[test]
    fn args_override_file() {
        let file = ConfigFile::from_yaml(
            "model: gemini-2.0-flash\nthemes: [light, dark]\nbase_url: http://localhost:9000/\nuse_color: false\n",
        )
        .unwrap();
        let config = ChatConfig::new().with_file(file).with_args(ChatArgs {
            model: Some("gemini-2.5-flash-lite".to_string()),
            ..ChatArgs::default()
        });
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25FlashLite));
        assert_eq!(config.themes, vec!["light", "dark"]);
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000/"));
        assert!(!config.use_color);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ChatConfig::from_args(ChatArgs {
            timeout_secs: Some(0),
            ..ChatArgs::default()
        })
        .unwrap_err();
        assert!(err.is_validation());

        let file = ConfigFile::from_yaml("timeout_secs: 0\n").unwrap();
        assert!(ChatConfig::new().with_file(file).validate().is_err());
        assert!(ChatConfig::new().validate().is_ok());
    }

    #[test]
    fn unknown_file_field_is_rejected() {
        assert!(ConfigFile::from_yaml("max_tokens: 10\n").is_err());
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let err = ChatConfig::from_args(ChatArgs {
            config: Some("/nonexistent/edu-assistant.yaml".to_string()),
            ..ChatArgs::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn theme_cycle_from_config() {
        let cycle = ChatConfig::new().theme_cycle().unwrap();
        assert_eq!(cycle.len(), 2);
        assert_eq!(cycle.current().name(), "dark");

        let err = ChatConfig::new()
            .with_themes(vec!["sepia".to_string()])
            .theme_cycle()
            .unwrap_err();
        assert!(err.is_validation());
        assert!(ChatConfig::new().with_themes(Vec::new()).theme_cycle().is_err());
    }

    #[test]
    fn build_client_without_key_is_configuration_error() {
        let config = ChatConfig {
            api_key_var: "EDU_ASSISTANT_CONFIG_TEST_UNSET".to_string(),
            ..ChatConfig::new()
        };
        assert!(config.build_client().unwrap_err().is_configuration());
    }
}
