//! Configuration management
//!
//! 設定は以下の優先順位で読み込まれます:
//! 1. 環境変数
//! 2. toolgate.toml 設定ファイル
//! 3. デフォルト値
//!
//! 設定ファイル内では `${VAR_NAME}` 形式で環境変数を展開できます。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Error;

/// Default config file name looked up by [`Config::load`]
pub const CONFIG_FILE: &str = "toolgate.toml";

/// Remote tool catalog connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// API key sent as a bearer token
    pub api_key: String,

    /// Base URL of the catalog service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of tools requested when listing a toolkit
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

/// Profile of the agent the tools are exported for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Display name
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// System instructions
    #[serde(default = "default_instructions")]
    pub instructions: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            instructions: default_instructions(),
            model: default_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Main configuration for toolgate
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Catalog service configuration
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Toolkits loaded in full at startup
    #[serde(default)]
    pub toolkits: Vec<String>,

    /// Individual tools loaded at startup
    #[serde(default)]
    pub tools: Vec<String>,

    /// Agent profile
    #[serde(default)]
    pub agent: AgentConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_base_url() -> String {
    "https://api.arcade.dev".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_page_size() -> u32 {
    100
}

fn default_agent_name() -> String {
    "Github Agent".to_string()
}

fn default_instructions() -> String {
    "You are a helpful assistant that can use Github tools.".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_toolkits() -> Vec<String> {
    vec!["github".to_string()]
}

/// Split a comma separated list, dropping empty entries
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    /// 設定ファイルから環境変数を展開する
    ///
    /// `${VAR_NAME}` 形式の文字列を環境変数の値に置換します。
    /// 環境変数が存在しない場合は空文字列になります。
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // '{' を消費

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// TOML 設定ファイルから設定を読み込む
    ///
    /// # 引数
    /// * `path` - TOML ファイルのパス
    ///
    /// 読み込み後、環境変数で上書きされます。
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut cfg = Self::from_toml_str(&toml_content)?;

        // 既存の環境変数で上書き（環境変数が優先）
        cfg.apply_env_overrides();
        cfg.validate()?;

        Ok(cfg)
    }

    /// Parse TOML content (after `${VAR}` expansion) without env overrides
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let expanded_content = Self::expand_env_vars(content);

        let toml: TomlConfig = toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        Ok(Self::from_toml_config(toml))
    }

    /// デフォルトパスから設定を読み込む
    ///
    /// 1. `./toolgate.toml`
    /// 2. 見つからない場合は環境変数のみ
    pub fn load() -> crate::Result<Self> {
        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }

        Self::from_env()
    }

    /// TOML 構造から Config を構築
    fn from_toml_config(toml: TomlConfig) -> Self {
        let catalog = toml.catalog.unwrap_or_default();
        let catalog_config = CatalogConfig {
            api_key: catalog.api_key.unwrap_or_default(),
            base_url: catalog.base_url.unwrap_or_else(default_base_url),
            timeout_secs: catalog.timeout_secs.unwrap_or_else(default_timeout_secs),
            page_size: catalog.page_size.unwrap_or_else(default_page_size),
        };

        let agent = toml.agent.unwrap_or_default();
        let agent_config = AgentConfig {
            name: agent.name.unwrap_or_else(default_agent_name),
            instructions: agent.instructions.unwrap_or_else(default_instructions),
            model: agent.model.unwrap_or_else(default_model),
        };

        let logging = toml.logging.unwrap_or_default();

        Config {
            catalog: catalog_config,
            toolkits: toml.toolkits.unwrap_or_else(default_toolkits),
            tools: toml.tools.unwrap_or_default(),
            agent: agent_config,
            logging: LoggingConfig {
                level: logging.level.unwrap_or_else(default_log_level),
            },
        }
    }

    /// 環境変数で設定を上書きする
    fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var("TOOLGATE_API_KEY") {
            if !api_key.is_empty() {
                self.catalog.api_key = api_key;
            }
        }
        if let Ok(base_url) = std::env::var("TOOLGATE_BASE_URL") {
            if !base_url.is_empty() {
                self.catalog.base_url = base_url;
            }
        }
        if let Ok(timeout) = std::env::var("TOOLGATE_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.catalog.timeout_secs = t;
            }
        }
        if let Ok(toolkits) = std::env::var("TOOLGATE_TOOLKITS") {
            self.toolkits = split_list(&toolkits);
        }
        if let Ok(tools) = std::env::var("TOOLGATE_TOOLS") {
            self.tools = split_list(&tools);
        }
        if let Ok(model) = std::env::var("TOOLGATE_MODEL") {
            if !model.is_empty() {
                self.agent.model = model;
            }
        }
        if let Ok(level) = std::env::var("TOOLGATE_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let api_key = std::env::var("TOOLGATE_API_KEY")
            .map_err(|_| Error::Config("TOOLGATE_API_KEY not set".to_string()))?;

        let mut cfg = Config {
            catalog: CatalogConfig {
                api_key,
                ..CatalogConfig::default()
            },
            toolkits: default_toolkits(),
            ..Config::default()
        };
        cfg.apply_env_overrides();
        cfg.validate()?;

        Ok(cfg)
    }

    /// Check the settings that have no usable default
    pub fn validate(&self) -> crate::Result<()> {
        if self.catalog.api_key.is_empty() {
            return Err(Error::Config("catalog.api_key is empty".to_string()));
        }
        if !self.catalog.base_url.starts_with("http://")
            && !self.catalog.base_url.starts_with("https://")
        {
            return Err(Error::Config(format!(
                "catalog.base_url must be an http(s) URL: {}",
                self.catalog.base_url
            )));
        }
        Ok(())
    }
}

// ============================================================================
// TOML 構造体定義（ファイル解析用）
// ============================================================================

/// TOML ファイル用のトップレベル構造
#[derive(Debug, Deserialize)]
struct TomlConfig {
    catalog: Option<TomlCatalogConfig>,
    toolkits: Option<Vec<String>>,
    tools: Option<Vec<String>>,
    agent: Option<TomlAgentConfig>,
    logging: Option<TomlLoggingConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlCatalogConfig {
    /// API キー
    #[serde(default)]
    api_key: Option<String>,
    /// ベース URL
    #[serde(default)]
    base_url: Option<String>,
    /// タイムアウト（秒）
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default)]
    page_size: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlAgentConfig {
    name: Option<String>,
    instructions: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlLoggingConfig {
    /// ログレベル
    level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_catalog_config_default() {
        let config = CatalogConfig::default();
        assert_eq!(config.base_url, "https://api.arcade.dev");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.page_size, 100);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_agent_config_default() {
        let config = AgentConfig::default();
        assert_eq!(config.name, "Github Agent");
        assert_eq!(config.model, "gpt-4o");
    }

    #[test]
    fn test_from_toml_str() {
        let config = Config::from_toml_str(
            r#"
            toolkits = ["github", "slack"]
            tools = ["Google.ListEmails"]

            [catalog]
            api_key = "key"
            base_url = "http://localhost:9099"
            timeout_secs = 5

            [agent]
            model = "gpt-4o-mini"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog.api_key, "key");
        assert_eq!(config.catalog.base_url, "http://localhost:9099");
        assert_eq!(config.catalog.timeout_secs, 5);
        assert_eq!(config.catalog.page_size, 100);
        assert_eq!(config.toolkits, vec!["github", "slack"]);
        assert_eq!(config.tools, vec!["Google.ListEmails"]);
        assert_eq!(config.agent.model, "gpt-4o-mini");
        assert_eq!(config.agent.name, "Github Agent");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_from_toml_str_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.toolkits, vec!["github"]);
        assert!(config.tools.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let err = Config::from_toml_str("toolkits = 3").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_toml_file_expands_env() {
        unsafe {
            std::env::set_var("TOOLGATE_TEST_FILE_KEY", "from-env");
        }

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[catalog]\napi_key = \"${{TOOLGATE_TEST_FILE_KEY}}\"").unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();
        if std::env::var("TOOLGATE_API_KEY").is_err() {
            assert_eq!(config.catalog.api_key, "from-env");
        }

        unsafe {
            std::env::remove_var("TOOLGATE_TEST_FILE_KEY");
        }
    }

    #[test]
    fn test_from_toml_file_missing() {
        let err = Config::from_toml_file("/nonexistent/toolgate.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.catalog.api_key = "key".to_string();
        assert!(config.validate().is_ok());

        config.catalog.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expand_env_vars() {
        unsafe {
            std::env::set_var("TOOLGATE_TEST_VAR", "test_value");
        }

        let result = Config::expand_env_vars("prefix_${TOOLGATE_TEST_VAR}_suffix");
        assert_eq!(result, "prefix_test_value_suffix");

        // 存在しない環境変数
        let result = Config::expand_env_vars("prefix_${TOOLGATE_NONEXISTENT_VAR}_suffix");
        assert_eq!(result, "prefix__suffix");

        unsafe {
            std::env::remove_var("TOOLGATE_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_no_braces() {
        let result = Config::expand_env_vars("no_vars_here $HOME");
        assert_eq!(result, "no_vars_here $HOME");
    }

    #[test]
    fn test_expand_env_vars_empty_name() {
        let result = Config::expand_env_vars("${}_content");
        assert_eq!(result, "_content");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("github, slack,,"), vec!["github", "slack"]);
        assert!(split_list("").is_empty());
    }
}
