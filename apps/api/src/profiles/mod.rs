// Employee sessions: profile, learning preferences, current learning path, chat history.

pub mod handlers;
pub mod store;
