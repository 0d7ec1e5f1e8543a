//! Local JSON backend for a desktop shell, and the packager that stages its
//! source tree for distribution.
//!
//! The `backend` binary serves the HTTP endpoints in [`handler`]; the
//! `packager` binary drives [`packager::Packager`].

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod packager;
pub mod server;
