// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Profile, Role, RankTier, MatchResult, RankedCandidate};
pub use requests::{FindMatchesRequest, RankRequest, ScoreRequest};
pub use responses::{FindMatchesResponse, HealthResponse, ErrorResponse, InvalidateCacheResponse};
