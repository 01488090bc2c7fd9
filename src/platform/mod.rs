//! Platform Integration Module
//!
//! The core is driven by a display-server runtime through the [`Host`] and
//! [`Renderer`] traits. `headless` provides recording implementations of
//! both for running without a backend.

pub mod api;
pub mod headless;

pub use api::{Host, Renderer};
pub use headless::{HeadlessHost, HeadlessRenderer};
