//! Core library for potluck: local recipe storage, shake-to-pick selection,
//! the cooking streak, and the nutrition companion.
//!
//! Everything persists to a single SQLite file owned by this process; there
//! is no network surface. The CLI crate is the only consumer.

pub mod catalog;
pub mod db;
pub mod models;
pub mod motion;
pub mod nutrition;
pub mod service;
pub mod shake;
