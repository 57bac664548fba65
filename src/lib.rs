//! Word Lens: dictionary lookups through a thin proxy, with saved history,
//! recent searches, a word of the day and a vocabulary quiz.
//!
//! The proxy ([`proxy`]) forwards `GET ?word=` to the public dictionary API.
//! Everything else is client-side state owned by [`app::App`] and persisted
//! in a local SQLite key-value store ([`storage`]).

pub mod app;
pub mod config;
pub mod consts;
pub mod daily;
pub mod entry;
pub mod error;
pub mod history;
pub mod presentation;
pub mod proxy;
pub mod quiz;
pub mod session;
pub mod storage;
pub mod theme;
pub mod upstream;
pub mod words;

#[cfg(test)]
mod test_support;
