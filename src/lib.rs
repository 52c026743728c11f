//! Payment intake gateway: accepts payments over HTTP, forwards each one to a
//! default or fallback processor through per-processor circuit breakers, and
//! serves summaries merged with a peer instance.

pub mod app;
pub mod handlers;
pub mod models;
pub mod queue;
pub mod services;
