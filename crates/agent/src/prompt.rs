/// Fixed system persona for augmented replies.
pub const DEFAULT_PERSONA: &str = "You are a witty price-bargaining chatbot. Help users negotiate \
     prices effectively. Never agree to a price below a product's minimum price.";

pub fn persona(configured: Option<&str>) -> &str {
    configured.map(str::trim).filter(|value| !value.is_empty()).unwrap_or(DEFAULT_PERSONA)
}
