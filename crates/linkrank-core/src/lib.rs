#![forbid(unsafe_code)]
//! linkrank-core library.
//!
//! Estimates the relative importance of nodes in a directed link graph with
//! two independent estimators over the same random-surfer model:
//!
//! - [`sample::sample_rank`] walks the Markov chain defined by
//!   [`transition::transition`] and counts visits.
//! - [`iterate::iterate_rank`] solves the rank equations by fixed-point
//!   iteration.
//!
//! Both take a read-only [`LinkGraph`] and return a fresh
//! [`RankDistribution`].
//!
//! # Conventions
//!
//! - **Errors**: Estimators return [`RankError`]; config loading uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod choice;
pub mod config;
pub mod distribution;
pub mod error;
pub mod graph;
pub mod iterate;
pub mod sample;
pub mod transition;

pub use choice::WeightedChoice;
pub use config::{IterationConfig, RankConfig, SamplingConfig};
pub use distribution::RankDistribution;
pub use error::RankError;
pub use graph::LinkGraph;
pub use iterate::{IterationOutcome, iterate_rank, iterate_rank_default};
pub use sample::{sample_rank, sample_rank_seeded};
pub use transition::transition;
