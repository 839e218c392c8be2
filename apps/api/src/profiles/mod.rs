pub mod completeness;
pub mod handlers;
