//! Prompt templates for the two answer paths.

/// Template for questions answered with live market data
pub const CRYPTO_EXPERT_PROMPT: &str = r"As a cryptocurrency expert assistant, answer the user's question using this real-time data:

{context}

User Question: {message}

Provide a helpful, accurate response. Include current prices and market data when relevant.
Keep the response concise and mention that crypto investments carry risks.";

/// Template for general questions, no market data injected
pub const CRYPTO_EDUCATOR_PROMPT: &str = r"As a cryptocurrency education assistant, answer this question: {message}

Provide educational, balanced information about cryptocurrency and blockchain technology.
Include relevant examples and always mention risks associated with crypto investments.
Keep the response informative but concise.";

/// Fill the expert template. The message is substituted last so user text is never re-scanned.
pub fn crypto_prompt(context: &str, user_message: &str) -> String {
    CRYPTO_EXPERT_PROMPT
        .replace("{context}", context)
        .replace("{message}", user_message)
}

pub fn general_prompt(user_message: &str) -> String {
    CRYPTO_EDUCATOR_PROMPT.replace("{message}", user_message)
}
