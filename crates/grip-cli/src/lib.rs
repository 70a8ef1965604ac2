//! Terminal front end for the Grip contract strategist
//!
//! `grip ask` sends a single question (uploading a contract if given one) and
//! prints the advice; `grip chat` keeps a conversation open so follow-up
//! questions reuse the contract already on the server.

pub mod ask;
pub mod chat;
pub mod logging;
