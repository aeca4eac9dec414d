//! # Drapex API
//!
//! The [`Engine`] facade wires the index, scorers and pricing together;
//! [`RestApi`] exposes it over HTTP.

pub mod config;
pub mod engine;
pub mod rest;

pub use config::{EngineConfig, IndexSettings};
pub use engine::{Engine, ListingUpdate};
pub use rest::{routes, RestApi};
