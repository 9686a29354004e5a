pub mod error;
pub mod remote;
pub mod traits;

pub use error::BrokerError;
pub use remote::BinanceClient;
pub use traits::Brokerage;

#[cfg(any(test, feature = "mocks"))]
pub use traits::MockBrokerage;
