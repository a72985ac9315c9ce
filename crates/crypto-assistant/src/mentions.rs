//! Keyword tables for query classification and coin extraction.
//!
//! Both lookups are case-insensitive substring scans over the raw text, so
//! "sol" also matches inside "solution".

/// Keyword/ticker → canonical CoinGecko id, scanned in this order
pub const COIN_MENTIONS: &[(&str, &str)] = &[
    ("bitcoin", "bitcoin"),
    ("btc", "bitcoin"),
    ("ethereum", "ethereum"),
    ("eth", "ethereum"),
    ("cardano", "cardano"),
    ("ada", "cardano"),
    ("solana", "solana"),
    ("sol", "solana"),
];

/// Words that route a chat message to the market-data path
pub const CRYPTO_KEYWORDS: &[&str] = &[
    "price",
    "bitcoin",
    "ethereum",
    "crypto",
    "coin",
    "market",
    "trading",
    "investment",
    "blockchain",
    "btc",
    "eth",
];

/// Canonical ids mentioned in `query`, de-duplicated, in table order
pub fn mentioned_coins(query: &str) -> Vec<&'static str> {
    let query = query.to_lowercase();
    let mut ids: Vec<&'static str> = Vec::new();

    for (mention, coin_id) in COIN_MENTIONS {
        if query.contains(mention) && !ids.contains(coin_id) {
            ids.push(coin_id);
        }
    }

    ids
}

/// Whether `message` should be answered with live market data
pub fn is_crypto_query(message: &str) -> bool {
    let message = message.to_lowercase();
    CRYPTO_KEYWORDS
        .iter()
        .any(|keyword| message.contains(keyword))
}
