pub mod handlers;
pub mod hiring;
