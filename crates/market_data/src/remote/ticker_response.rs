use serde::Deserialize;

use crate::error::BrokerError;

#[derive(Deserialize, Debug)]
pub struct Ticker24h {
    pub symbol: String,
    #[serde(rename = "priceChangePercent")]
    pub price_change_percent: String,
}

/// Orders tickers by 24h change, largest gain first, and keeps `limit` of them.
///
/// Only pairs quoted in `quote_asset` are kept, since funds are held in that
/// asset. Tickers whose change cannot be parsed are dropped.
pub fn top_gainers(
    tickers: Vec<Ticker24h>,
    quote_asset: &str,
    limit: usize,
) -> Result<Vec<String>, BrokerError> {
    let quote = quote_asset.to_uppercase();
    let mut ranked: Vec<(String, f64)> = tickers
        .into_iter()
        .filter(|t| is_quoted_in(&t.symbol, &quote))
        .filter_map(|t| {
            t.price_change_percent
                .parse::<f64>()
                .ok()
                .filter(|pct| pct.is_finite())
                .map(|pct| (t.symbol, pct))
        })
        .collect();

    if ranked.is_empty() {
        return Err(BrokerError::EmptyResponse("ticker/24hr".to_string()));
    }

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(ranked
        .into_iter()
        .take(limit)
        .map(|(symbol, _)| symbol)
        .collect())
}

fn is_quoted_in(symbol: &str, quote: &str) -> bool {
    symbol.len() > quote.len() && symbol.ends_with(quote)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(symbol: &str, pct: &str) -> Ticker24h {
        Ticker24h {
            symbol: symbol.to_string(),
            price_change_percent: pct.to_string(),
        }
    }

    #[test]
    fn sorts_by_change_and_truncates() {
        let tickers = vec![
            ticker("AAAUSDT", "1.5"),
            ticker("BBBUSDT", "12.0"),
            ticker("CCCUSDT", "-3.2"),
            ticker("DDDUSDT", "7.25"),
        ];
        assert_eq!(
            top_gainers(tickers, "USDT", 2).unwrap(),
            vec!["BBBUSDT", "DDDUSDT"]
        );
    }

    #[test]
    fn skips_unparsable_entries() {
        let tickers = vec![ticker("AAAUSDT", "n/a"), ticker("BBBUSDT", "0.1")];
        assert_eq!(top_gainers(tickers, "USDT", 10).unwrap(), vec!["BBBUSDT"]);
    }

    #[test]
    fn keeps_only_pairs_in_quote_asset() {
        let tickers = vec![
            ticker("ETHBTC", "20.0"),
            ticker("BTCEUR", "15.0"),
            ticker("SOLUSDT", "5.0"),
            ticker("USDT", "30.0"),
            ticker("XRPUSDT", "2.5"),
        ];
        assert_eq!(
            top_gainers(tickers, "usdt", 2).unwrap(),
            vec!["SOLUSDT", "XRPUSDT"]
        );
    }

    #[test]
    fn no_pair_in_quote_asset_is_an_error() {
        let tickers = vec![ticker("ETHBTC", "20.0"), ticker("BTCEUR", "15.0")];
        assert!(matches!(
            top_gainers(tickers, "USDT", 5),
            Err(BrokerError::EmptyResponse(_))
        ));
    }

    #[test]
    fn empty_listing_is_an_error() {
        assert!(matches!(
            top_gainers(Vec::new(), "USDT", 10),
            Err(BrokerError::EmptyResponse(_))
        ));
    }
}
