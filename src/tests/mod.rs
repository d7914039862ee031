//! Black-box tests for the whole API
//!
//! The router is driven in-process, backed by the memory storage

mod auth;
mod helper;
