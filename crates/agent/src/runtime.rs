use std::sync::Arc;

use haggle_core::catalog::Catalog;
use haggle_core::compose::{augmented_reply, compose_direct, llm_context, no_match_reply};
use haggle_core::config::{AppConfig, ReplyMode};
use haggle_core::matcher::Matcher;
use tracing::{info, warn};

use crate::llm::CompletionClient;
use crate::prompt;

/// The request pipeline: match → select/compose → optional completion call.
/// Stateless per request; the catalog is read-only shared state. Every path
/// returns reply text, never an error.
pub struct BotRuntime {
    catalog: Arc<Catalog>,
    matcher: Matcher,
    mode: ReplyMode,
    fallback: String,
    max_llm_products: usize,
    persona: String,
    completion: Arc<dyn CompletionClient>,
}

impl BotRuntime {
    pub fn new(
        catalog: Arc<Catalog>,
        config: &AppConfig,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            catalog,
            matcher: Matcher::new(config.catalog.match_scope),
            mode: config.reply.mode,
            fallback: config.reply.fallback.clone(),
            max_llm_products: config.reply.max_llm_products,
            persona: prompt::persona(config.llm.persona.as_deref()).to_string(),
            completion,
        }
    }

    pub async fn handle(&self, query: &str, correlation_id: &str) -> String {
        let matches = self.matcher.matches(&self.catalog, query);
        info!(
            event_name = "bot.match.resolved",
            correlation_id,
            match_count = matches.len(),
            "query resolved against catalog"
        );

        if matches.is_empty() {
            return no_match_reply(query);
        }

        match self.mode {
            ReplyMode::Direct => compose_direct(query, &matches),
            ReplyMode::Augmented => {
                let context = llm_context(query, &matches, self.max_llm_products);
                match self.completion.complete(&self.persona, &context).await {
                    Ok(body) => {
                        info!(
                            event_name = "bot.completion.ok",
                            correlation_id,
                            reply_chars = body.len(),
                            "completion call succeeded"
                        );
                        augmented_reply(&body)
                    }
                    Err(error) => {
                        warn!(
                            event_name = "bot.completion.degraded",
                            correlation_id,
                            error = %error,
                            "completion call failed, using fallback reply"
                        );
                        self.fallback.clone()
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use haggle_core::catalog::{Catalog, ProductRecord};
    use haggle_core::config::{AppConfig, ReplyMode};
    use rust_decimal::Decimal;

    use super::BotRuntime;
    use crate::llm::{CompletionClient, CompletionError, FailingCompletionClient};

    /// Captures every prompt it receives and answers with a canned body.
    struct RecordingClient {
        calls: Mutex<Vec<(String, String)>>,
        reply: String,
    }

    impl RecordingClient {
        fn new(reply: &str) -> Self {
            Self { calls: Mutex::new(Vec::new()), reply: reply.to_string() }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().expect("calls lock").len()
        }

        fn last_user_content(&self) -> Option<String> {
            self.calls.lock().expect("calls lock").last().map(|(_, user)| user.clone())
        }
    }

    #[async_trait]
    impl CompletionClient for RecordingClient {
        async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
            self.calls.lock().expect("calls lock").push((system.to_string(), user.to_string()));
            Ok(self.reply.clone())
        }
    }

    fn product(serial: &str, name: &str) -> ProductRecord {
        ProductRecord {
            serial_number: serial.to_string(),
            name: name.to_string(),
            category: Some("Footwear".to_string()),
            mrp: Some(Decimal::from(1000)),
            minimum_price: Some(Decimal::from(800)),
            units_available: Some(5),
            description: None,
            specifications: None,
            shipping_details: None,
            policy: None,
            image_url: None,
            video_url: None,
        }
    }

    fn config(mode: ReplyMode) -> AppConfig {
        let mut config = AppConfig::default();
        config.reply.mode = mode;
        config
    }

    fn runtime(
        catalog: Catalog,
        mode: ReplyMode,
        completion: Arc<dyn CompletionClient>,
    ) -> BotRuntime {
        BotRuntime::new(Arc::new(catalog), &config(mode), completion)
    }

    #[tokio::test]
    async fn empty_catalog_yields_the_no_match_reply_without_a_completion_call() {
        let client = Arc::new(RecordingClient::new("unused"));
        let runtime = runtime(Catalog::empty(), ReplyMode::Augmented, client.clone());

        let reply = runtime.handle("anything", "req-1").await;

        assert_eq!(
            reply,
            "Sorry, I couldn't find any products matching 'anything'. Let me know if I can assist further!"
        );
        assert_eq!(client.call_count(), 0, "no completion call should be attempted");
    }

    #[tokio::test]
    async fn direct_mode_never_calls_the_completion_service() {
        let client = Arc::new(RecordingClient::new("unused"));
        let catalog = Catalog::new(vec![product("1", "Red Shoes")]);
        let runtime = runtime(catalog, ReplyMode::Direct, client.clone());

        let reply = runtime.handle("what is the price of shoes", "req-2").await;

        assert_eq!(reply, "Red Shoes\nMRP: 1000, Minimum Price: 800");
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn augmented_mode_bounds_the_context_to_three_products() {
        let client = Arc::new(RecordingClient::new("Let's make a deal."));
        let catalog = Catalog::new(
            (1..=5).map(|n| product(&n.to_string(), &format!("Shoes {n}"))).collect(),
        );
        let runtime = runtime(catalog, ReplyMode::Augmented, client.clone());

        let reply = runtime.handle("shoes", "req-3").await;

        assert!(reply.starts_with("Let's make a deal."));
        let context = client.last_user_content().expect("completion call recorded");
        assert_eq!(context.matches("Product Name:").count(), 3);
    }

    #[tokio::test]
    async fn completion_failure_degrades_to_the_configured_fallback() {
        let catalog = Catalog::new(vec![product("1", "Red Shoes")]);
        let runtime = runtime(catalog, ReplyMode::Augmented, Arc::new(FailingCompletionClient));

        let reply = runtime.handle("shoes", "req-4").await;

        assert_eq!(reply, AppConfig::default().reply.fallback);
    }

    #[tokio::test]
    async fn every_path_produces_non_empty_reply_text() {
        let catalog = Catalog::new(vec![product("1", "Red Shoes")]);
        let direct = runtime(catalog.clone(), ReplyMode::Direct, Arc::new(FailingCompletionClient));
        let augmented = runtime(catalog, ReplyMode::Augmented, Arc::new(FailingCompletionClient));

        assert!(!direct.handle("", "req-5").await.is_empty());
        assert!(!direct.handle("shoes", "req-5").await.is_empty());
        assert!(!augmented.handle("shoes", "req-5").await.is_empty());
    }
}
