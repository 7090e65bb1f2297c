use crate::catalog::ProductRecord;
use crate::intent::{active_categories, select_details};

/// Appended after model-generated reply bodies so the conversation always ends
/// with a next step.
pub const CLOSING_CALL_TO_ACTION: &str =
    "Let me know which product you'd like to bargain for!";

/// Deterministic zero-match reply. Sent as-is, with no completion call.
pub fn no_match_reply(query: &str) -> String {
    format!(
        "Sorry, I couldn't find any products matching '{}'. Let me know if I can assist further!",
        query.trim()
    )
}

/// Direct-mode composition: selected detail lines when the query names an
/// intent, a full product card otherwise. One section per match, blank-line
/// separated. Never returns an empty string.
pub fn compose_direct(query: &str, matches: &[&ProductRecord]) -> String {
    if matches.is_empty() {
        return no_match_reply(query);
    }

    let has_intent = !active_categories(query).is_empty();
    matches
        .iter()
        .map(|product| {
            if has_intent {
                format!("{}\n{}", product.name, select_details(query, product))
            } else {
                product_card(product)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Full field rendering for a single product, placeholders included.
pub fn product_card(product: &ProductRecord) -> String {
    format!(
        "Product: {}\nCategory: {}\nMRP: {}\nMinimum Price: {}\nUnits Available: {}\nDescription: {}\nImage: {}",
        product.name,
        product.category_text(),
        product.mrp_text(),
        product.minimum_price_text(),
        product.units_text(),
        product.description_text(),
        product.image_text(),
    )
}

/// Context block handed to the completion call in augmented mode. The match
/// set is truncated to `limit` products here, the single place the cost and
/// message-length bound is enforced.
pub fn llm_context(query: &str, matches: &[&ProductRecord], limit: usize) -> String {
    let details = matches
        .iter()
        .take(limit)
        .map(|product| {
            format!(
                "Product Name: {}\nCategory: {}\nMRP: {}\nMinimum Price: {}\nUnits Available: {}\nSpecifications: {}\n",
                product.name,
                product.category_text(),
                product.mrp_text(),
                product.minimum_price_text(),
                product.units_text(),
                product.specifications_text(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "The user is asking about '{}'. Here are the matching products:\n{}",
        query.trim(),
        details
    )
}

/// Wraps a completion-call body (or the configured fallback) into the final
/// augmented reply.
pub fn augmented_reply(body: &str) -> String {
    format!("{}\n\n{}", body.trim(), CLOSING_CALL_TO_ACTION)
}
