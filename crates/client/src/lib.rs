//! `goat-client`
//!
//! **Responsibility:** HTTP access to the registry's resource collections.
//!
//! This crate provides:
//! - list/create for every `goat_core::Resource`
//! - the 202 poll protocol behind concept search and identical lookup
//! - a pluggable `Transport` (a `reqwest` one for production, a scripted one
//!   for tests)
//!
//! Base URL, token and poll bounds come from `ClientConfig`; nothing is read
//! from process globals unless `from_env` is called.

pub mod client;
pub mod collection;
pub mod config;
pub mod context;
pub mod error;
pub mod poller;
pub mod transport;

pub use client::RegistryClient;
pub use collection::CollectionClient;
pub use config::{ClientConfig, ConfigError, PollPolicy};
pub use error::{ClientError, ClientResult};
pub use poller::{AsyncSearchPoller, CancelHandle, CancelToken};
pub use transport::{
    HttpRequest, HttpResponse, HttpTransport, Method, ScriptedTransport, Transport,
    TransportError,
};
