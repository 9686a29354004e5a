pub mod candidate;
pub mod order;
pub mod price;

pub use candidate::Candidate;
pub use order::{OrderIntent, OrderType, Side, TimeInForce};
pub use price::{PriceBar, PriceSeries};
