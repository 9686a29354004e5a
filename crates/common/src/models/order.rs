use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInForce {
    GoodTillCanceled,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Market => write!(f, "MARKET"),
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoodTillCanceled => write!(f, "GTC"),
        }
    }
}

/// Fully specified instruction sent to the brokerage. Not kept after submission.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderIntent {
    pub symbol: String,
    pub side: Side,
    pub quantity: u32,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
}

impl OrderIntent {
    pub fn market_buy(symbol: impl Into<String>, quantity: u32) -> Self {
        Self {
            symbol: symbol.into(),
            side: Side::Buy,
            quantity,
            order_type: OrderType::Market,
            time_in_force: TimeInForce::GoodTillCanceled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_buy_is_gtc_market_order() {
        let intent = OrderIntent::market_buy("BNBUSDT", 1);
        assert_eq!(intent.side, Side::Buy);
        assert_eq!(intent.order_type, OrderType::Market);
        assert_eq!(intent.time_in_force, TimeInForce::GoodTillCanceled);
        assert_eq!(
            format!("{} {} {}", intent.side, intent.order_type, intent.time_in_force),
            "BUY MARKET GTC"
        );
    }
}
