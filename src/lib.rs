// src/lib.rs

//! Groups files that tend to change together in a git history.
//!
//! Every commit's set of touched files is treated as a hyperedge; the
//! connected components over all commits form the groups, which are then
//! drawn as a row of colored blocks.

pub mod cli;
pub mod cluster;
pub mod error;
pub mod history;
pub mod model;
pub mod renderer;
