//! Server assembly: configuration, logging, router construction, and the
//! serve loop behind the `abacus-server` binary.

pub mod bootstrap;
pub mod config;
pub mod logging;
pub mod openapi;
