// Quote Document Builder
// Party/metadata models, fixed wording, layout of the quote regions and the PDF endpoint.
// PDF building is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod builder;
pub mod handlers;
pub mod models;
pub mod sections;
