//! Builds a unified manifest of every dataset published by the Melodi
//! statistical catalog: the two raw catalog record shapes are normalized into
//! one descriptor schema, each referenced asset is downloaded and inspected,
//! and the aggregated manifest is written to an object store.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod inspect;
pub mod locale;
pub mod normalize;
pub mod pipeline;
pub mod store;
