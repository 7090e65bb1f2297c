use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub whatsapp: WhatsappConfig,
    pub llm: LlmConfig,
    pub reply: ReplyConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub path: PathBuf,
    pub match_scope: MatchScope,
}

#[derive(Clone, Debug)]
pub struct WhatsappConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<SecretString>,
    pub from_number: Option<String>,
    pub api_base_url: String,
}

impl WhatsappConfig {
    /// Outbound sending is only attempted with full provider credentials;
    /// otherwise the reply travels back in the webhook response alone.
    pub fn send_enabled(&self) -> bool {
        self.account_sid.is_some() && self.auth_token.is_some() && self.from_number.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub persona: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ReplyConfig {
    pub mode: ReplyMode,
    pub fallback: String,
    pub max_llm_products: usize,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchScope {
    Name,
    AllFields,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyMode {
    Direct,
    Augmented,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub catalog_path: Option<PathBuf>,
    pub match_scope: Option<MatchScope>,
    pub reply_mode: Option<ReplyMode>,
    pub llm_api_key: Option<String>,
    pub llm_base_url: Option<String>,
    pub llm_model: Option<String>,
    pub whatsapp_account_sid: Option<String>,
    pub whatsapp_auth_token: Option<String>,
    pub whatsapp_from_number: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                path: PathBuf::from("products.csv"),
                match_scope: MatchScope::Name,
            },
            whatsapp: WhatsappConfig {
                account_sid: None,
                auth_token: None,
                from_number: None,
                api_base_url: "https://api.twilio.com".to_string(),
            },
            llm: LlmConfig {
                api_key: None,
                base_url: "http://localhost:11434/v1".to_string(),
                model: "llama3.1".to_string(),
                timeout_secs: 30,
                persona: None,
            },
            reply: ReplyConfig {
                mode: ReplyMode::Direct,
                fallback: "Sorry, I couldn't generate a reply.".to_string(),
                max_llm_products: 3,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8000,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for MatchScope {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "all_fields" => Ok(Self::AllFields),
            other => Err(ConfigError::Validation(format!(
                "unsupported match scope `{other}` (expected name|all_fields)"
            ))),
        }
    }
}

impl std::str::FromStr for ReplyMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "augmented" => Ok(Self::Augmented),
            other => Err(ConfigError::Validation(format!(
                "unsupported reply mode `{other}` (expected direct|augmented)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("haggle.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = path;
            }
            if let Some(match_scope) = catalog.match_scope {
                self.catalog.match_scope = match_scope;
            }
        }

        if let Some(whatsapp) = patch.whatsapp {
            if let Some(account_sid) = whatsapp.account_sid {
                self.whatsapp.account_sid = Some(account_sid);
            }
            if let Some(auth_token_value) = whatsapp.auth_token {
                self.whatsapp.auth_token = Some(secret_value(auth_token_value));
            }
            if let Some(from_number) = whatsapp.from_number {
                self.whatsapp.from_number = Some(from_number);
            }
            if let Some(api_base_url) = whatsapp.api_base_url {
                self.whatsapp.api_base_url = api_base_url;
            }
        }

        if let Some(llm) = patch.llm {
            if let Some(api_key_value) = llm.api_key {
                self.llm.api_key = Some(secret_value(api_key_value));
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = base_url;
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
            if let Some(persona) = llm.persona {
                self.llm.persona = Some(persona);
            }
        }

        if let Some(reply) = patch.reply {
            if let Some(mode) = reply.mode {
                self.reply.mode = mode;
            }
            if let Some(fallback) = reply.fallback {
                self.reply.fallback = fallback;
            }
            if let Some(max_llm_products) = reply.max_llm_products {
                self.reply.max_llm_products = max_llm_products;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("HAGGLE_CATALOG_PATH") {
            self.catalog.path = PathBuf::from(value);
        }
        if let Some(value) = read_env("HAGGLE_CATALOG_MATCH_SCOPE") {
            self.catalog.match_scope = value.parse()?;
        }

        if let Some(value) = read_env("HAGGLE_WHATSAPP_ACCOUNT_SID") {
            self.whatsapp.account_sid = Some(value);
        }
        if let Some(value) = read_env("HAGGLE_WHATSAPP_AUTH_TOKEN") {
            self.whatsapp.auth_token = Some(secret_value(value));
        }
        if let Some(value) = read_env("HAGGLE_WHATSAPP_FROM_NUMBER") {
            self.whatsapp.from_number = Some(value);
        }
        if let Some(value) = read_env("HAGGLE_WHATSAPP_API_BASE_URL") {
            self.whatsapp.api_base_url = value;
        }

        if let Some(value) = read_env("HAGGLE_LLM_API_KEY") {
            self.llm.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("HAGGLE_LLM_BASE_URL") {
            self.llm.base_url = value;
        }
        if let Some(value) = read_env("HAGGLE_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("HAGGLE_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_u64("HAGGLE_LLM_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("HAGGLE_LLM_PERSONA") {
            self.llm.persona = Some(value);
        }

        if let Some(value) = read_env("HAGGLE_REPLY_MODE") {
            self.reply.mode = value.parse()?;
        }
        if let Some(value) = read_env("HAGGLE_REPLY_FALLBACK") {
            self.reply.fallback = value;
        }
        if let Some(value) = read_env("HAGGLE_REPLY_MAX_LLM_PRODUCTS") {
            self.reply.max_llm_products =
                parse_u64("HAGGLE_REPLY_MAX_LLM_PRODUCTS", &value)? as usize;
        }

        if let Some(value) = read_env("HAGGLE_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("HAGGLE_SERVER_PORT") {
            self.server.port = parse_u16("HAGGLE_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("HAGGLE_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("HAGGLE_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level = read_env("HAGGLE_LOGGING_LEVEL").or_else(|| read_env("HAGGLE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("HAGGLE_LOGGING_FORMAT").or_else(|| read_env("HAGGLE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(catalog_path) = overrides.catalog_path {
            self.catalog.path = catalog_path;
        }
        if let Some(match_scope) = overrides.match_scope {
            self.catalog.match_scope = match_scope;
        }
        if let Some(reply_mode) = overrides.reply_mode {
            self.reply.mode = reply_mode;
        }
        if let Some(llm_api_key) = overrides.llm_api_key {
            self.llm.api_key = Some(secret_value(llm_api_key));
        }
        if let Some(llm_base_url) = overrides.llm_base_url {
            self.llm.base_url = llm_base_url;
        }
        if let Some(llm_model) = overrides.llm_model {
            self.llm.model = llm_model;
        }
        if let Some(account_sid) = overrides.whatsapp_account_sid {
            self.whatsapp.account_sid = Some(account_sid);
        }
        if let Some(auth_token) = overrides.whatsapp_auth_token {
            self.whatsapp.auth_token = Some(secret_value(auth_token));
        }
        if let Some(from_number) = overrides.whatsapp_from_number {
            self.whatsapp.from_number = Some(from_number);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_whatsapp(&self.whatsapp)?;
        validate_llm(&self.llm, self.reply.mode)?;
        validate_reply(&self.reply)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("haggle.toml"), PathBuf::from("config/haggle.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_whatsapp(whatsapp: &WhatsappConfig) -> Result<(), ConfigError> {
    let has_sid = whatsapp.account_sid.as_ref().map(|v| !v.trim().is_empty()).unwrap_or(false);
    let has_token = whatsapp
        .auth_token
        .as_ref()
        .map(|v| !v.expose_secret().trim().is_empty())
        .unwrap_or(false);
    let has_from = whatsapp.from_number.as_ref().map(|v| !v.trim().is_empty()).unwrap_or(false);

    if has_sid != has_token {
        return Err(ConfigError::Validation(
            "whatsapp.account_sid and whatsapp.auth_token must be configured together".to_string(),
        ));
    }
    if has_sid && !has_from {
        return Err(ConfigError::Validation(
            "whatsapp.from_number is required when provider credentials are set".to_string(),
        ));
    }

    if !whatsapp.api_base_url.starts_with("http://")
        && !whatsapp.api_base_url.starts_with("https://")
    {
        return Err(ConfigError::Validation(
            "whatsapp.api_base_url must start with http:// or https://".to_string(),
        ));
    }

    Ok(())
}

fn validate_llm(llm: &LlmConfig, mode: ReplyMode) -> Result<(), ConfigError> {
    if llm.timeout_secs == 0 || llm.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "llm.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if !llm.base_url.starts_with("http://") && !llm.base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "llm.base_url must start with http:// or https://".to_string(),
        ));
    }

    if mode == ReplyMode::Augmented {
        let missing = llm
            .api_key
            .as_ref()
            .map(|value| value.expose_secret().trim().is_empty())
            .unwrap_or(true);
        if missing {
            return Err(ConfigError::Validation(
                "llm.api_key is required when reply.mode is augmented".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_reply(reply: &ReplyConfig) -> Result<(), ConfigError> {
    if reply.max_llm_products == 0 || reply.max_llm_products > 3 {
        return Err(ConfigError::Validation(
            "reply.max_llm_products must be in range 1..=3".to_string(),
        ));
    }

    if reply.fallback.trim().is_empty() {
        return Err(ConfigError::Validation("reply.fallback must not be empty".to_string()));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    whatsapp: Option<WhatsappPatch>,
    llm: Option<LlmPatch>,
    reply: Option<ReplyPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<PathBuf>,
    match_scope: Option<MatchScope>,
}

#[derive(Debug, Default, Deserialize)]
struct WhatsappPatch {
    account_sid: Option<String>,
    auth_token: Option<String>,
    from_number: Option<String>,
    api_base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    persona: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyPatch {
    mode: Option<ReplyMode>,
    fallback: Option<String>,
    max_llm_products: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{
        AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, MatchScope, ReplyMode,
    };

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_validate_without_any_configuration() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.catalog.match_scope == MatchScope::Name, "default scope should be name")?;
        ensure(config.reply.mode == ReplyMode::Direct, "default mode should be direct")?;
        ensure(config.reply.max_llm_products == 3, "default llm product bound should be 3")?;
        ensure(!config.whatsapp.send_enabled(), "sending should be disabled without credentials")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_WA_AUTH_TOKEN", "token-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("haggle.toml");
            fs::write(
                &path,
                r#"
[whatsapp]
account_sid = "AC123"
auth_token = "${TEST_WA_AUTH_TOKEN}"
from_number = "whatsapp:+10000000000"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            let token = config
                .whatsapp
                .auth_token
                .as_ref()
                .ok_or_else(|| "auth token should be set".to_string())?;
            ensure(
                token.expose_secret() == "token-from-env",
                "auth token should be loaded from environment",
            )?;
            ensure(config.whatsapp.send_enabled(), "full credentials should enable sending")?;
            Ok(())
        })();

        clear_vars(&["TEST_WA_AUTH_TOKEN"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("HAGGLE_LOG_LEVEL", "warn");
        env::set_var("HAGGLE_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&["HAGGLE_LOG_LEVEL", "HAGGLE_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("HAGGLE_LLM_MODEL", "model-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("haggle.toml");
            fs::write(
                &path,
                r#"
[catalog]
path = "from-file.csv"

[llm]
model = "model-from-file"

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    catalog_path: Some("from-override.csv".into()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.catalog.path.to_string_lossy() == "from-override.csv",
                "override catalog path should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                config.llm.model == "model-from-env",
                "env model should win over file and defaults",
            )?;
            Ok(())
        })();

        clear_vars(&["HAGGLE_LLM_MODEL"]);
        result
    }

    #[test]
    fn augmented_mode_requires_an_api_key() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let error = match AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                reply_mode: Some(ReplyMode::Augmented),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }) {
            Ok(_) => {
                return Err("expected validation failure but config load succeeded".to_string())
            }
            Err(error) => error,
        };

        let has_message = matches!(
            error,
            ConfigError::Validation(ref message) if message.contains("llm.api_key")
        );
        ensure(has_message, "validation failure should mention llm.api_key")
    }

    #[test]
    fn partial_provider_credentials_fail_validation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let error = match AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                whatsapp_account_sid: Some("AC123".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }) {
            Ok(_) => {
                return Err("expected validation failure but config load succeeded".to_string())
            }
            Err(error) => error,
        };

        let has_message = matches!(
            error,
            ConfigError::Validation(ref message) if message.contains("whatsapp.account_sid")
        );
        ensure(has_message, "validation failure should mention whatsapp credentials")
    }

    #[test]
    fn secret_values_are_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("HAGGLE_LLM_API_KEY", "sk-secret-value");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");

            ensure(!debug.contains("sk-secret-value"), "debug output should not contain api key")?;
            ensure(
                matches!(config.logging.format, LogFormat::Compact),
                "default logging format should be compact",
            )?;
            Ok(())
        })();

        clear_vars(&["HAGGLE_LLM_API_KEY"]);
        result
    }
}
