use chrono::{DateTime, Utc};
use common::models::PriceBar;
use serde::Deserialize;
use serde_json::Value;

use crate::error::BrokerError;
use crate::traits::RemoteResponse;

/// One row of `GET /api/v3/klines`.
///
/// The venue returns each kline as a positional array:
/// `[open_time, open, high, low, close, volume, close_time, ...]`.
#[derive(Deserialize, Debug)]
#[serde(transparent)]
pub struct KlineRow(Vec<Value>);

const OPEN_TIME: usize = 0;
const CLOSE_PRICE: usize = 4;

impl RemoteResponse<PriceBar> for KlineRow {
    fn to_model(&self) -> Result<PriceBar, BrokerError> {
        let open_time = self
            .0
            .get(OPEN_TIME)
            .and_then(Value::as_i64)
            .ok_or_else(|| BrokerError::Decode("kline open time missing".to_string()))?;
        let time = DateTime::<Utc>::from_timestamp_millis(open_time)
            .ok_or_else(|| BrokerError::Decode(format!("kline open time {open_time} out of range")))?;

        let close = match self.0.get(CLOSE_PRICE) {
            Some(Value::String(raw)) => raw
                .parse::<f64>()
                .map_err(|e| BrokerError::Decode(format!("kline close {raw:?}: {e}")))?,
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| BrokerError::Decode("kline close not representable".to_string()))?,
            _ => return Err(BrokerError::Decode("kline close price missing".to_string())),
        };

        if !close.is_finite() {
            return Err(BrokerError::Decode(format!("kline close {close} is not finite")));
        }

        Ok(PriceBar { time, close })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_positional_kline() {
        let raw = r#"[1499040000000,"0.01634790","0.80000000","0.01575800","0.01577100","148976.11427815",1499644799999,"2434.19055334",308,"1756.87402397","28.46694368","0"]"#;
        let row: KlineRow = serde_json::from_str(raw).unwrap();
        let bar = row.to_model().unwrap();

        assert_eq!(bar.time.timestamp_millis(), 1_499_040_000_000);
        assert!((bar.close - 0.015771).abs() < 1e-12);
    }

    #[test]
    fn rejects_truncated_kline() {
        let row: KlineRow = serde_json::from_str(r#"[1499040000000,"1.0"]"#).unwrap();
        assert!(matches!(row.to_model(), Err(BrokerError::Decode(_))));
    }

    #[test]
    fn rejects_unparsable_close() {
        let row: KlineRow =
            serde_json::from_str(r#"[1499040000000,"1","1","1","abc","1",1499644799999]"#).unwrap();
        assert!(matches!(row.to_model(), Err(BrokerError::Decode(_))));
    }
}
