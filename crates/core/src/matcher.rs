use crate::catalog::{Catalog, ProductRecord};
use crate::config::MatchScope;

/// Resolves free-text queries to candidate product records by case-insensitive
/// substring containment, preserving catalog order. No ranking, no fuzzing.
#[derive(Clone, Copy, Debug)]
pub struct Matcher {
    scope: MatchScope,
}

impl Matcher {
    pub fn new(scope: MatchScope) -> Self {
        Self { scope }
    }

    /// An empty or whitespace-only query matches nothing; returning the whole
    /// catalog for a blank message would be worse than no answer.
    pub fn matches<'a>(&self, catalog: &'a Catalog, query: &str) -> Vec<&'a ProductRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        catalog
            .records()
            .iter()
            .filter(|record| haystack(record, self.scope).contains(&needle))
            .collect()
    }
}

fn haystack(record: &ProductRecord, scope: MatchScope) -> String {
    match scope {
        MatchScope::Name => record.name.to_lowercase(),
        MatchScope::AllFields => {
            let mut text = record.name.clone();
            for field in [
                &record.category,
                &record.description,
                &record.specifications,
                &record.shipping_details,
                &record.policy,
            ] {
                if let Some(value) = field {
                    text.push('\n');
                    text.push_str(value);
                }
            }
            text.to_lowercase()
        }
    }
}
