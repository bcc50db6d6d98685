// Adapters layer: concrete implementations for external systems (files, terminal, output formats).

pub mod csv_input;
pub mod quota_prompt;
pub mod report;
pub mod storage;

pub use storage::LocalStorage;
