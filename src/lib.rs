pub mod catalog;
pub mod cli;
pub mod ledger;

pub use cli::error::{WagtailError, WagtailErrorKind};
