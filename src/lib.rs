//! Browsing and onboarding core for the Artistly talent marketplace.
//!
//! The heart of the crate is [`artists::filter`], which maps filter state to and
//! from flat parameter mappings, and [`artists::matcher`], which narrows an
//! artist collection down to the entries satisfying a [`FilterSpec`]. The
//! remaining modules are the collaborators around them: an HTTP client for the
//! hosted backend, a browse session that tracks fetch state, and a debouncer
//! for free-text input.

pub mod artists;
pub mod backend;
pub mod browse;
pub mod debounce;
pub mod settings;

pub use artists::filter::{FilterSpec, ParamMap, PriceBand};
pub use artists::matcher::MatchMode;
pub use artists::Artist;

/// Default error type
pub type ArtistlyError = Box<dyn std::error::Error + Send + Sync>;
