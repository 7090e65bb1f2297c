use std::path::PathBuf;

use haggle_core::catalog::Catalog;
use haggle_core::compose::compose_direct;
use haggle_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use haggle_core::matcher::Matcher;

use super::CommandResult;

/// Runs a query through the same match-and-compose path the webhook uses, in
/// direct mode, so operators can inspect replies without standing up a server.
pub fn run(query: &str, catalog_path: Option<PathBuf>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions {
        overrides: ConfigOverrides { catalog_path, ..ConfigOverrides::default() },
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult {
                exit_code: 2,
                output: format!("config validation failed: {error}"),
            }
        }
    };

    let catalog = Catalog::load(&config.catalog.path);
    let matcher = Matcher::new(config.catalog.match_scope);
    let matches = matcher.matches(&catalog, query);

    CommandResult { exit_code: 0, output: compose_direct(query, &matches) }
}
