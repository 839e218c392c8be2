pub mod application;
pub mod job;
pub mod notification;
pub mod talent;
pub mod user;
