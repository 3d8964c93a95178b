//! SQL Chat gateway server library.
//!
//! Routes, extractors, error mapping and application state live here so the
//! integration tests can drive the router without binding a socket.

pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod routes;
pub mod state;
