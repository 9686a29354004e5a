use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use common::config::BrokerConfig;
use common::models::{OrderIntent, PriceBar, PriceSeries};
use hmac::{Hmac, Mac};
use reqwest::{Client, Method, Response};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::BrokerError;
use crate::remote::account_response::AccountInformation;
use crate::remote::kline_response::KlineRow;
use crate::remote::ticker_response::{Ticker24h, top_gainers};
use crate::traits::{Brokerage, RemoteResponse};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    #[serde(rename = "orderId")]
    pub order_id: u64,
    pub symbol: String,
    pub status: String,
    #[serde(rename = "executedQty")]
    pub executed_qty: String,
}

#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
    api_key: String,
    secret_key: String,
    quote_asset: String,
}

impl BinanceClient {
    pub fn new(config: &BrokerConfig) -> Result<Self, BrokerError> {
        let client = Client::builder()
            .user_agent("rsi_forest_bot/0.1.0")
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            secret_key: config.secret_key.clone(),
            quote_asset: config.quote_asset.clone(),
        })
    }

    fn sign(&self, query: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(query.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn signed_url(&self, path: &str, params: &str) -> String {
        let params = if params.is_empty() {
            format!("timestamp={}", Utc::now().timestamp_millis())
        } else {
            format!("{}&timestamp={}", params, Utc::now().timestamp_millis())
        };
        let signature = self.sign(&params);
        format!("{}{}?{}&signature={}", self.base_url, path, params, signature)
    }

    async fn check(resp: Response, what: &str) -> Result<Response, BrokerError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await?;
        error!("Binance {} failed ({}): {}", what, status, body);
        Err(BrokerError::Api {
            status: status.as_u16(),
            body,
        })
    }

    pub async fn get_account(&self) -> Result<AccountInformation, BrokerError> {
        let url = self.signed_url("/api/v3/account", "");

        let resp = self
            .client
            .get(&url)
            .header("X-MBX-APIKEY", &self.api_key)
            .send()
            .await?;

        let account_info = Self::check(resp, "account info")
            .await?
            .json::<AccountInformation>()
            .await?;
        Ok(account_info)
    }

    pub async fn post_order(&self, order: &OrderIntent) -> Result<OrderResponse, BrokerError> {
        // Market orders take no timeInForce on this venue.
        let params = format!(
            "symbol={}&side={}&type={}&quantity={}&newClientOrderId={}",
            order.symbol.to_uppercase(),
            order.side,
            order.order_type,
            order.quantity,
            Uuid::new_v4().simple()
        );
        let url = self.signed_url("/api/v3/order", &params);

        info!(
            "Placing Order: {} {} {} ({} {})",
            order.side, order.quantity, order.symbol, order.order_type, order.time_in_force
        );

        let resp = self
            .client
            .request(Method::POST, &url)
            .header("X-MBX-APIKEY", &self.api_key)
            .send()
            .await?;

        let order_resp = Self::check(resp, "order")
            .await?
            .json::<OrderResponse>()
            .await?;
        Ok(order_resp)
    }
}

#[async_trait]
impl Brokerage for BinanceClient {
    async fn fetch_bars(
        &self,
        symbol: &str,
        interval: &str,
        count: usize,
    ) -> Result<PriceSeries, BrokerError> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let limit = count.to_string();
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", interval),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let rows = Self::check(resp, "klines")
            .await?
            .json::<Vec<KlineRow>>()
            .await?;
        if rows.is_empty() {
            return Err(BrokerError::EmptyResponse(symbol.to_string()));
        }

        let bars = rows
            .iter()
            .map(|row| row.to_model())
            .collect::<Result<Vec<PriceBar>, _>>()?;
        debug!("Fetched {} {} bars for {}", bars.len(), interval, symbol);

        Ok(PriceSeries::new(symbol, bars))
    }

    async fn fetch_available_funds(&self) -> Result<f64, BrokerError> {
        let info = self.get_account().await?;
        if !info.can_trade {
            info!("Account reports trading disabled");
        }
        info.free_balance(&self.quote_asset)
    }

    async fn fetch_top_movers(&self, limit: usize) -> Result<Vec<String>, BrokerError> {
        let url = format!("{}/api/v3/ticker/24hr", self.base_url);
        let resp = self.client.get(&url).send().await?;

        let tickers = Self::check(resp, "24h ticker")
            .await?
            .json::<Vec<Ticker24h>>()
            .await?;
        top_gainers(tickers, &self.quote_asset, limit)
    }

    async fn submit_order(&self, order: &OrderIntent) -> Result<(), BrokerError> {
        let resp = self.post_order(order).await?;
        info!(
            "ORDER ACCEPTED: ID={}, Symbol={}, Status={}, Executed={}",
            resp.order_id, resp.symbol, resp.status, resp.executed_qty
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BinanceClient {
        BinanceClient::new(&BrokerConfig {
            api_key: "key".into(),
            // Example key from the venue's signing documentation.
            secret_key: "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j".into(),
            base_url: "https://api.example.test/".into(),
            quote_asset: "USDT".into(),
        })
        .unwrap()
    }

    #[test]
    fn signature_matches_reference_vector() {
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            client().sign(query),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn signed_url_appends_timestamp_and_signature() {
        let url = client().signed_url("/api/v3/account", "");
        assert!(url.starts_with("https://api.example.test/api/v3/account?timestamp="));
        assert!(url.contains("&signature="));
    }
}
