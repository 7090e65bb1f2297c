use crate::catalog::ProductRecord;

/// Lightweight intent classification: a fixed keyword taxonomy mapping query
/// phrasing onto the product fields worth surfacing in a reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailCategory {
    Price,
    Availability,
    Specifications,
    Shipping,
    Policy,
}

/// Stable emission order. Output must not depend on where a keyword happened
/// to appear in the query.
const CATEGORY_ORDER: [DetailCategory; 5] = [
    DetailCategory::Price,
    DetailCategory::Availability,
    DetailCategory::Specifications,
    DetailCategory::Shipping,
    DetailCategory::Policy,
];

const NO_CATEGORY_FALLBACK: &str =
    "Tell me what you'd like to know: price, availability, specifications, shipping, or policies.";

fn trigger_keywords(category: DetailCategory) -> &'static [&'static str] {
    match category {
        DetailCategory::Price => &["price", "cost", "mrp", "rate", "how much"],
        DetailCategory::Availability => {
            &["available", "availability", "stock", "units", "quantity"]
        }
        DetailCategory::Specifications => &["spec", "feature", "detail"],
        DetailCategory::Shipping => &["ship", "delivery", "deliver"],
        DetailCategory::Policy => &["policy", "return", "refund", "warranty", "exchange"],
    }
}

pub fn active_categories(query: &str) -> Vec<DetailCategory> {
    let query = query.to_lowercase();
    CATEGORY_ORDER
        .into_iter()
        .filter(|category| {
            trigger_keywords(*category).iter().any(|keyword| query.contains(keyword))
        })
        .collect()
}

/// Emits one line per triggered category in the fixed order, or a single
/// guidance line when the query triggers nothing. Never returns empty text.
pub fn select_details(query: &str, product: &ProductRecord) -> String {
    let categories = active_categories(query);
    if categories.is_empty() {
        return NO_CATEGORY_FALLBACK.to_string();
    }

    categories
        .into_iter()
        .map(|category| detail_line(category, product))
        .collect::<Vec<_>>()
        .join("\n")
}

fn detail_line(category: DetailCategory, product: &ProductRecord) -> String {
    match category {
        DetailCategory::Price => format!(
            "MRP: {}, Minimum Price: {}",
            product.mrp_text(),
            product.minimum_price_text()
        ),
        DetailCategory::Availability => format!("Units Available: {}", product.units_text()),
        DetailCategory::Specifications => {
            format!("Specifications: {}", product.specifications_text())
        }
        DetailCategory::Shipping => format!("Shipping: {}", product.shipping_text()),
        DetailCategory::Policy => format!("Policy: {}", product.policy_text()),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{active_categories, select_details, DetailCategory, NO_CATEGORY_FALLBACK};
    use crate::catalog::ProductRecord;

    fn red_shoes() -> ProductRecord {
        ProductRecord {
            serial_number: "1".to_string(),
            name: "Red Shoes".to_string(),
            category: Some("Footwear".to_string()),
            mrp: Some(Decimal::from(1000)),
            minimum_price: Some(Decimal::from(800)),
            units_available: Some(5),
            description: Some("Comfortable running shoes".to_string()),
            specifications: Some("Rubber sole, mesh upper".to_string()),
            shipping_details: Some("Ships in 3 days".to_string()),
            policy: Some("7 day returns".to_string()),
            image_url: None,
            video_url: None,
        }
    }

    #[test]
    fn price_only_query_yields_only_the_price_line() {
        let reply = select_details("what is the price of shoes", &red_shoes());
        assert_eq!(reply, "MRP: 1000, Minimum Price: 800");
    }

    #[test]
    fn categories_emit_in_fixed_order_regardless_of_query_order() {
        let reply = select_details("is it in stock and how much does it cost", &red_shoes());
        assert_eq!(reply, "MRP: 1000, Minimum Price: 800\nUnits Available: 5");
    }

    #[test]
    fn keyword_matching_is_case_insensitive() {
        assert_eq!(active_categories("SHIPPING time?"), vec![DetailCategory::Shipping]);
    }

    #[test]
    fn untriggered_query_gets_the_guidance_line() {
        let reply = select_details("tell me something", &red_shoes());
        assert_eq!(reply, NO_CATEGORY_FALLBACK);
        assert!(!reply.is_empty());
    }

    #[test]
    fn all_categories_trigger_together() {
        let reply = select_details(
            "price, availability, specs, delivery and return policy please",
            &red_shoes(),
        );
        let lines: Vec<&str> = reply.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("MRP:"));
        assert!(lines[1].starts_with("Units Available:"));
        assert!(lines[2].starts_with("Specifications:"));
        assert!(lines[3].starts_with("Shipping:"));
        assert!(lines[4].starts_with("Policy:"));
    }

    #[test]
    fn missing_fields_render_as_placeholders_not_omissions() {
        let mut product = red_shoes();
        product.mrp = None;
        product.minimum_price = None;

        let reply = select_details("price?", &product);
        assert_eq!(reply, "MRP: not available, Minimum Price: not available");
    }
}
