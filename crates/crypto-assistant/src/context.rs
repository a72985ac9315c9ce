//! Context Formatter
//!
//! Renders a [`CryptoDataBag`] into the one-line fact summary embedded in prompts.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::{CoinQuote, CryptoDataBag, MarketCoin, TrendingCoin};

/// Returned for an empty bag
pub const NO_CURRENT_DATA: &str = "No current crypto data available.";

/// Returned when a bag has entries but none of them could be rendered
pub const NO_DATA: &str = "No crypto data available.";

const SEPARATOR: &str = " | ";

/// Market leaders shown from the overview
const LEADERS_SHOWN: usize = 3;

/// Render the bag as `"Bitcoin: $97500.00 (+2.50%) | Trending: Pepe, Sui"`
pub fn format_crypto_context(bag: &CryptoDataBag) -> String {
    if bag.is_empty() {
        return NO_CURRENT_DATA.into();
    }

    let mut parts = Vec::new();

    for (coin_id, quote) in bag.coins() {
        if let Some(part) = format_coin(coin_id, quote) {
            parts.push(part);
        }
    }

    if let Some(part) = bag.market_overview().and_then(format_overview) {
        parts.push(part);
    }

    if let Some(part) = bag.trending().and_then(format_trending) {
        parts.push(part);
    }

    if parts.is_empty() {
        NO_DATA.into()
    } else {
        parts.join(SEPARATOR)
    }
}

fn format_coin(coin_id: &str, quote: &CoinQuote) -> Option<String> {
    let price = quote.price("usd")?;
    let change = quote.change_24h("usd").unwrap_or(Decimal::ZERO);
    Some(format!(
        "{}: ${:.2} ({:+.2}%)",
        title_case(coin_id),
        cents(price),
        cents(change)
    ))
}

/// Two decimal places, midpoints away from zero
fn cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn format_overview(coins: &[MarketCoin]) -> Option<String> {
    if coins.is_empty() {
        return None;
    }

    let leaders: Vec<String> = coins
        .iter()
        .take(LEADERS_SHOWN)
        .filter_map(|c| Some(format!("{}: ${:.2}", c.name, cents(c.current_price?))))
        .collect();

    Some(format!("Market Leaders: {}", leaders.join(SEPARATOR)))
}

fn format_trending(coins: &[TrendingCoin]) -> Option<String> {
    if coins.is_empty() {
        return None;
    }

    let names: Vec<&str> = coins.iter().map(|c| c.name.as_str()).collect();
    Some(format!("Trending: {}", names.join(", ")))
}

/// Upper-case the first letter of every alphabetic run: `usd-coin` → `Usd-Coin`
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_bag() {
        assert_eq!(
            format_crypto_context(&CryptoDataBag::new()),
            NO_CURRENT_DATA
        );
    }

    #[test]
    fn test_coin_line() {
        let mut bag = CryptoDataBag::new();
        bag.insert_coin(
            "ethereum",
            CoinQuote::new()
                .with("usd", dec!(2500.1234))
                .with("usd_24h_change", dec!(1.5)),
        );
        assert_eq!(format_crypto_context(&bag), "Ethereum: $2500.12 (+1.50%)");
    }

    #[test]
    fn test_missing_change_defaults_to_zero() {
        let mut bag = CryptoDataBag::new();
        bag.insert_coin("cardano", CoinQuote::new().with("usd", dec!(0.951)));
        assert_eq!(format_crypto_context(&bag), "Cardano: $0.95 (+0.00%)");
    }

    #[test]
    fn test_negative_change_and_hyphenated_id() {
        let mut bag = CryptoDataBag::new();
        bag.insert_coin(
            "usd-coin",
            CoinQuote::new()
                .with("usd", dec!(1))
                .with("usd_24h_change", dec!(-0.016)),
        );
        assert_eq!(format_crypto_context(&bag), "Usd-Coin: $1.00 (-0.02%)");
    }

    #[test]
    fn test_midpoints_round_away_from_zero() {
        let mut bag = CryptoDataBag::new();
        bag.insert_coin(
            "bitcoin",
            CoinQuote::new()
                .with("usd", dec!(97500.125))
                .with("usd_24h_change", dec!(-2.345)),
        );
        assert_eq!(format_crypto_context(&bag), "Bitcoin: $97500.13 (-2.35%)");
    }

    #[test]
    fn test_quote_without_usd_is_skipped() {
        let mut bag = CryptoDataBag::new();
        bag.insert_coin("bitcoin", CoinQuote::new().with("eur", dec!(90000)));
        assert_eq!(format_crypto_context(&bag), NO_DATA);
    }

    #[test]
    fn test_overview_shows_three_leaders() {
        let mut bag = CryptoDataBag::new();
        bag.set_market_overview(vec![
            MarketCoin::new("bitcoin", "btc", "Bitcoin", dec!(97500)),
            MarketCoin::new("ethereum", "eth", "Ethereum", dec!(3450.5)),
            MarketCoin::new("tether", "usdt", "Tether", dec!(1)),
            MarketCoin::new("ripple", "xrp", "XRP", dec!(2.35)),
        ]);
        assert_eq!(
            format_crypto_context(&bag),
            "Market Leaders: Bitcoin: $97500.00 | Ethereum: $3450.50 | Tether: $1.00"
        );
    }

    #[test]
    fn test_full_bag_order() {
        let mut bag = CryptoDataBag::new();
        bag.set_trending(vec![
            TrendingCoin::new("pepe", "Pepe", "PEPE"),
            TrendingCoin::new("sui", "Sui", "SUI"),
        ]);
        bag.insert_coin(
            "bitcoin",
            CoinQuote::new()
                .with("usd", dec!(97500))
                .with("usd_24h_change", dec!(2.5)),
        );
        assert_eq!(
            format_crypto_context(&bag),
            "Bitcoin: $97500.00 (+2.50%) | Trending: Pepe, Sui"
        );
    }

    #[test]
    fn test_empty_lists_render_no_data() {
        let mut bag = CryptoDataBag::new();
        bag.set_trending(Vec::new());
        assert_eq!(format_crypto_context(&bag), NO_DATA);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("bitcoin"), "Bitcoin");
        assert_eq!(title_case("matic-network"), "Matic-Network");
        assert_eq!(title_case("avalanche-2"), "Avalanche-2");
    }
}
