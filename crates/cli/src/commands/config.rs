use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use haggle_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_key: &str| {
        field_source(key_path, env_key, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "catalog.path",
        &config.catalog.path.display().to_string(),
        source("catalog.path", "HAGGLE_CATALOG_PATH"),
    ));
    lines.push(render_line(
        "catalog.match_scope",
        &format!("{:?}", config.catalog.match_scope),
        source("catalog.match_scope", "HAGGLE_CATALOG_MATCH_SCOPE"),
    ));

    lines.push(render_line(
        "whatsapp.account_sid",
        config.whatsapp.account_sid.as_deref().unwrap_or("<unset>"),
        source("whatsapp.account_sid", "HAGGLE_WHATSAPP_ACCOUNT_SID"),
    ));
    let auth_token = match config.whatsapp.auth_token.as_ref() {
        Some(token) if token.expose_secret().trim().is_empty() => "<empty>",
        Some(_) => "<redacted>",
        None => "<unset>",
    };
    lines.push(render_line(
        "whatsapp.auth_token",
        auth_token,
        source("whatsapp.auth_token", "HAGGLE_WHATSAPP_AUTH_TOKEN"),
    ));
    lines.push(render_line(
        "whatsapp.from_number",
        config.whatsapp.from_number.as_deref().unwrap_or("<unset>"),
        source("whatsapp.from_number", "HAGGLE_WHATSAPP_FROM_NUMBER"),
    ));
    lines.push(render_line(
        "whatsapp.api_base_url",
        &config.whatsapp.api_base_url,
        source("whatsapp.api_base_url", "HAGGLE_WHATSAPP_API_BASE_URL"),
    ));

    let llm_api_key = if config.llm.api_key.is_some() { "<redacted>" } else { "<unset>" };
    lines.push(render_line("llm.api_key", llm_api_key, source("llm.api_key", "HAGGLE_LLM_API_KEY")));
    lines.push(render_line(
        "llm.base_url",
        &config.llm.base_url,
        source("llm.base_url", "HAGGLE_LLM_BASE_URL"),
    ));
    lines.push(render_line("llm.model", &config.llm.model, source("llm.model", "HAGGLE_LLM_MODEL")));
    lines.push(render_line(
        "llm.timeout_secs",
        &config.llm.timeout_secs.to_string(),
        source("llm.timeout_secs", "HAGGLE_LLM_TIMEOUT_SECS"),
    ));

    lines.push(render_line(
        "reply.mode",
        &format!("{:?}", config.reply.mode),
        source("reply.mode", "HAGGLE_REPLY_MODE"),
    ));
    lines.push(render_line(
        "reply.fallback",
        &config.reply.fallback,
        source("reply.fallback", "HAGGLE_REPLY_FALLBACK"),
    ));
    lines.push(render_line(
        "reply.max_llm_products",
        &config.reply.max_llm_products.to_string(),
        source("reply.max_llm_products", "HAGGLE_REPLY_MAX_LLM_PRODUCTS"),
    ));

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", "HAGGLE_SERVER_BIND_ADDRESS"),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", "HAGGLE_SERVER_PORT"),
    ));
    lines.push(render_line(
        "server.graceful_shutdown_secs",
        &config.server.graceful_shutdown_secs.to_string(),
        source("server.graceful_shutdown_secs", "HAGGLE_SERVER_GRACEFUL_SHUTDOWN_SECS"),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", "HAGGLE_LOGGING_LEVEL"),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", "HAGGLE_LOGGING_FORMAT"),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("haggle.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/haggle.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
