//! Word-level alignment tables and the word-span to time-interval mapping.

mod span;
mod table;
#[cfg(test)]
mod tests;

pub use span::span_to_interval;
pub use table::AlignmentTable;
