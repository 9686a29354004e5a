pub mod selection_service;

pub use selection_service::{SelectionReport, SelectionService, SymbolOutcome};
