pub mod colors;
pub mod formatting;
pub mod path;
pub mod table;

pub use formatting::{fill_bar, format_percent};
