//! Display formatting for terminal output
//!
//! Plain-text tables for bills and split results, used by the CLI.

pub mod bill;
pub mod result;

pub use bill::format_bill;
pub use result::format_split_report;
