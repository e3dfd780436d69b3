//! Output rendering: console tables and append-only JSONL.

pub mod jsonl;
pub mod table;

pub use jsonl::JsonlWriter;
pub use table::{format_watch_row, print_best_opportunity, print_market_list};
