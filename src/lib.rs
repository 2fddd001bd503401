//! Random movie picks from a personal watchlist, with plot-similarity
//! recommendations drawn from the same list.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
