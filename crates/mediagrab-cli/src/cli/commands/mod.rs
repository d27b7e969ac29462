//! CLI command handlers, one per file.

mod classify;
mod delete;
mod fetch;

pub use classify::run_classify;
pub use delete::run_delete;
pub use fetch::run_fetch;
