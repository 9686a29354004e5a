/// A symbol proposed for purchase. Fields are read-only after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    symbol: String,
    probability: f64,
    price: f64,
}

impl Candidate {
    pub fn new(symbol: impl Into<String>, probability: f64, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            probability,
            price,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Predicted probability of an upward move.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}
