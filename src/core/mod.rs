// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod pairing;
pub mod scoring;

pub use filters::{is_candidate, overlap_count, ScoringAttributes};
pub use matcher::{Matcher, RankingResult};
pub use pairing::{Instructor, Learner, MatchError, Participant};
pub use scoring::{calculate_match_score, rank_tier};
