pub mod account_response;
pub mod binance_client;
pub mod kline_response;
pub mod ticker_response;

pub use account_response::AccountInformation;
pub use binance_client::BinanceClient;
pub use kline_response::KlineRow;
pub use ticker_response::Ticker24h;
