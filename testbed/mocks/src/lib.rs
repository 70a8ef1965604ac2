//! Test doubles for the Grip analysis client
//!
//! Shared by the client and CLI test suites: an in-memory transport for state
//! machine tests and a real HTTP server for wire-format tests.

pub mod server;
pub mod transport;

pub use server::*;
pub use transport::*;
