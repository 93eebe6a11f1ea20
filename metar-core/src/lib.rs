//! Core library for the `metar` CLI.
//!
//! This crate defines:
//! - Pure decoders for METAR sky cover and present-weather codes
//! - Pressure / density altitude derivation
//! - Normalization of a raw station report into a display-ready snapshot
//! - Configuration and the aviationweather.gov fetch collaborator
//!
//! Everything outside `config` and `provider` is free of I/O and can be called from any
//! thread without coordination.

pub mod clouds;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod weather;

pub use clouds::decode_clouds;
pub use config::{Config, ProviderConfig};
pub use error::{DecodeError, DecodeResult};
pub use metrics::{DerivedMetrics, derive};
pub use model::{CloudLayer, Coverage, DecodedSnapshot, RawObservation, WindDirection};
pub use normalize::normalize;
pub use provider::{MetarProvider, StationId, decode_latest, provider_from_config};
pub use weather::decode_weather;
