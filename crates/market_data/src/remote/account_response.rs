use serde::Deserialize;

use crate::error::BrokerError;

#[derive(Debug, Deserialize)]
pub struct Balance {
    pub asset: String,
    pub free: String,
    pub locked: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountInformation {
    pub balances: Vec<Balance>,
    #[serde(rename = "canTrade")]
    pub can_trade: bool,
}

impl AccountInformation {
    /// Free balance of `asset`. Any other payload shape is reported as an error
    /// rather than guessed at.
    pub fn free_balance(&self, asset: &str) -> Result<f64, BrokerError> {
        let balance = self
            .balances
            .iter()
            .find(|b| b.asset.eq_ignore_ascii_case(asset))
            .ok_or_else(|| BrokerError::MissingAsset(asset.to_string()))?;

        balance
            .free
            .parse::<f64>()
            .map_err(|e| BrokerError::Decode(format!("free balance {:?}: {}", balance.free, e)))
    }
}
