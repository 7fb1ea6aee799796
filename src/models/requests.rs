use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::Profile;

/// Request to rank candidates for a user held in the profile store
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Request to rank an inline population against an inline profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankRequest {
    #[serde(rename = "self")]
    pub me: Profile,
    #[serde(default)]
    pub population: Vec<Profile>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Request to score a single instructor/learner pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub instructor: Profile,
    pub learner: Profile,
}
