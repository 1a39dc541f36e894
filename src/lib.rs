//! Harmony Algo - destination recommendation service for Family Harmony
//!
//! This library provides the recommendation core used by the Family
//! Harmony travel planner. It aggregates per-member category preferences,
//! runs a multi-stage filtering pipeline over the destination catalog, and
//! ranks the survivors with a trained scoring model.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{haversine_distance, Recommender, RecommendError};
pub use models::{
    DestinationTable, FamilyMember, FilterCriteria, NearestDestination, RecommendedDestination,
};
pub use services::{DestinationStore, LinearModel};
