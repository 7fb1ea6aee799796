//! Spotmatch - compatibility scoring and candidate ranking for gym coaching
//!
//! This library provides the engine that pairs instructors with learners:
//! a pure scoring function for one instructor/learner pair and a ranking
//! pipeline that applies it across a candidate population.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, RankingResult, Instructor, Learner, MatchError, calculate_match_score};
pub use crate::models::{Profile, Role, RankTier, MatchResult, RankedCandidate};
