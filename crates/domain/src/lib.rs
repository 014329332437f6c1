//! Shared domain types for the tidechat conversational core.
//!
//! Defines the error taxonomy, process-wide defaults, structured trace
//! events, retrieval/search shapes, the persona (assistant configuration)
//! model, and the wire request/response contracts with their cross-field
//! validation rules.  The session store and message tree live in
//! `tc-sessions`; persona resolution lives in `tc-assistants`.

pub mod config;
pub mod error;
pub mod message;
pub mod persona;
pub mod requests;
pub mod search;
pub mod trace;
pub mod validation;

pub use error::{Error, Result};
