use crate::domain::alert::Alert;

pub const SYSTEM_PROMPT: &str = "You are a financial markets analyst assistant. Given a market event, \
provide a brief, balanced assessment of likely bullish and bearish implications. Be concise (2-3 \
sentences), avoid speculation beyond what the facts support, and always note this is not financial advice.";

/// Builds the shared user-turn prompt both chat-API providers send;
/// providers differ only in request/response wire shape, grounded on the
/// original `_build_prompt` used by both OpenAIProvider and AnthropicProvider.
pub fn build_prompt(alert: &Alert) -> String {
    let catalysts = alert.catalysts();
    let catalyst_line = if catalysts.is_empty() {
        "none classified".to_string()
    } else {
        catalysts.join(", ")
    };

    format!(
        "Event: {}\nPriority: {:?}\nTicker: {}\nCompany: {}\nCatalysts: {catalyst_line}\nTitle: {}\nSummary: {}",
        alert.kind.label(),
        alert.priority,
        alert.ticker.clone().unwrap_or_else(|| "-".to_string()),
        alert.company,
        alert.title,
        alert.summary,
    )
}

pub fn trim_response(text: &str) -> String {
    text.trim().to_string()
}
