// Document layout
// Implements: static font metrics, greedy word wrap, a cursor-based page writer
// with automatic page breaks, font discovery and PDF serialization.

pub mod font_metrics;
pub mod fonts;
pub mod page;
pub mod render;
pub mod text;
pub mod wrap;

// Re-export the public API consumed by other modules (quote builder, state).
pub use font_metrics::{default_page_config, PageConfig};
