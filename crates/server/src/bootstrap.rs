use std::sync::Arc;

use haggle_agent::{BotRuntime, CompletionError, OpenAiChatClient};
use haggle_core::catalog::Catalog;
use haggle_core::config::{AppConfig, ConfigError, LoadOptions};
use haggle_whatsapp::{MessageSender, NoopSender, SendError, TwilioSender};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub catalog: Arc<Catalog>,
    pub runtime: Arc<BotRuntime>,
    pub sender: Arc<dyn MessageSender>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("completion client construction failed: {0}")]
    Completion(#[source] CompletionError),
    #[error("message sender construction failed: {0}")]
    Sender(#[source] SendError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let catalog = Arc::new(Catalog::load(&config.catalog.path));
    info!(
        event_name = "system.bootstrap.catalog_ready",
        correlation_id = "bootstrap",
        product_count = catalog.len(),
        "catalog ready"
    );

    let completion =
        OpenAiChatClient::from_config(&config.llm).map_err(BootstrapError::Completion)?;

    let sender: Arc<dyn MessageSender> = match TwilioSender::from_config(&config.whatsapp) {
        Some(sender) => Arc::new(sender.map_err(BootstrapError::Sender)?),
        None => {
            info!(
                event_name = "system.bootstrap.sender_noop",
                correlation_id = "bootstrap",
                "no provider credentials configured, outbound sends disabled"
            );
            Arc::new(NoopSender)
        }
    };

    let runtime = Arc::new(BotRuntime::new(catalog.clone(), &config, Arc::new(completion)));

    Ok(Application { config, catalog, runtime, sender })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use haggle_core::config::{AppConfig, ConfigOverrides, LoadOptions, ReplyMode};
    use tempfile::TempDir;

    use super::{bootstrap, bootstrap_with_config};

    #[test]
    fn bootstrap_fails_fast_on_invalid_configuration() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                reply_mode: Some(ReplyMode::Augmented),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        let message = match result {
            Ok(_) => panic!("augmented mode without an api key should fail validation"),
            Err(error) => error.to_string(),
        };
        assert!(message.contains("llm.api_key"));
    }

    #[test]
    fn bootstrap_loads_products_from_a_catalog_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("products.csv");
        fs::write(
            &path,
            "Serial Number,Product Name,Category,MRP,Minimum Price,Units Available\n\
             1,Red Shoes,Footwear,1000,800,5\n\
             2,Blue Hat,Apparel,500,350,12\n",
        )
        .expect("write catalog");

        let mut config = AppConfig::default();
        config.catalog.path = path;

        let app = bootstrap_with_config(config).expect("bootstrap");
        assert_eq!(app.catalog.len(), 2);
        assert_eq!(app.catalog.records()[0].name, "Red Shoes");
    }

    #[test]
    fn missing_catalog_file_degrades_to_an_empty_catalog() {
        let mut config = AppConfig::default();
        config.catalog.path = "/definitely/not/here.csv".into();

        let app = bootstrap_with_config(config).expect("bootstrap should not fail");
        assert!(app.catalog.is_empty());
    }

    #[test]
    fn bootstrap_selects_the_noop_sender_without_credentials() {
        let app = bootstrap_with_config(AppConfig::default()).expect("bootstrap");
        assert!(!app.config.whatsapp.send_enabled());
    }
}
