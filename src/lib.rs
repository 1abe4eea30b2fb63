//! fraudlens — a local dashboard for browsing a credit-card fraud dataset
//! and chatting with a hosted AI assistant grounded in that dataset.
//!
//! At startup the dataset is loaded from a directory, summarized into a
//! deterministic text block, and pushed into the remote assistant's
//! standing instructions. A session-scoped conversation thread then relays
//! chat turns through an append → run → poll → extract protocol loop.

pub mod analytics;
pub mod assistant;
pub mod chat;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod web;
