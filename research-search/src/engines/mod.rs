//! Search provider implementations.
//!
//! Each module provides a struct implementing [`crate::engine::SearchEngineTrait`]
//! for one provider's JSON API.

pub mod bing;
pub mod brave;
pub mod serpapi;

pub use bing::BingEngine;
pub use brave::BraveEngine;
pub use serpapi::SerpApiEngine;
