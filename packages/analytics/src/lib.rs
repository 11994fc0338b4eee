#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hotspot clustering and threat-level heuristics.
//!
//! A deliberately simple O(n) single-pass bucketing pass: records are
//! snapped to a coarse lat/lng grid, each cell accumulates a weighted
//! signal, and the cells are ranked into a bounded hotspot list. No
//! spatial index, no density-based clustering — grid snapping trades
//! precision for triviality. This is also the unconditional fallback
//! behind the external AI analysis call.

pub mod hotspots;

pub use hotspots::analyze;
