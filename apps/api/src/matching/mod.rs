// Talent/job matching: a pure scorer, a generic ranker, and the HTTP
// handlers that feed them candidate pools from the store.

pub mod handlers;
pub mod ranking;
pub mod scorer;
