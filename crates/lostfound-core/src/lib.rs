//! Core types and trait definitions for the lost & found matching engine.
//!
//! This crate is free of database and scoring dependencies. The engine
//! (`lostfound-match`) and storage backends (`lostfound-store-sqlite`) both
//! depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod candidate;
pub mod error;
pub mod item;
pub mod store;

pub use error::{Error, Result};
