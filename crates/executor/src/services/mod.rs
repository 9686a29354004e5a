pub mod execution_service;
pub mod telegram_service;

pub use execution_service::{ExecutionOutcome, ExecutionService};
pub use telegram_service::TelegramService;
