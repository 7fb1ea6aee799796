use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Which side of a coaching pair a participant is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "trainer")]
    Instructor,
    Learner,
}

impl Role {
    /// The role a participant of this role is paired with
    pub fn opposite(self) -> Self {
        match self {
            Role::Instructor => Role::Learner,
            Role::Learner => Role::Instructor,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Instructor => "instructor",
            Role::Learner => "learner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Participant profile as supplied by the profile store
///
/// Every attribute besides `id` and `role` is optional; scoring treats an
/// absent collection as empty and an absent scalar as non-matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(alias = "$id")]
    pub id: String,
    pub role: Role,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_age", skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub gym: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub specialties: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_experience",
        skip_serializing_if = "Option::is_none"
    )]
    pub experience: Option<u32>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub target_muscles: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub available_days: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub available_time: Option<String>,
}

impl Profile {
    /// Bare profile with only identity and role populated
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            name: None,
            age: None,
            gym: None,
            bio: None,
            specialties: None,
            experience: None,
            goals: None,
            target_muscles: None,
            level: None,
            available_days: None,
            available_time: None,
        }
    }
}

/// Optional attribute whose stored value may have the wrong shape.
/// A value that does not fit reads as absent instead of rejecting the profile.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Numbers have been stored both as JSON numbers and as form-entry strings
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
    Other(Value),
}

impl RawNumber {
    /// Non-negative whole part, if any. Strings read their leading digits,
    /// so `"3.5"` and `"3 years"` both give 3.
    fn whole(self) -> Option<u64> {
        match self {
            RawNumber::Unsigned(n) => Some(n),
            RawNumber::Signed(_) => None,
            RawNumber::Float(f) if f.is_finite() && f >= 0.0 => Some(f.trunc() as u64),
            RawNumber::Float(_) => None,
            RawNumber::Text(text) => {
                let text = text.trim_start();
                let digits = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
                match text[..digits].parse::<u64>() {
                    Ok(n) => Some(n),
                    Err(_) if digits > 0 => Some(u64::MAX),
                    Err(_) => None,
                }
            }
            RawNumber::Other(_) => None,
        }
    }
}

fn deserialize_experience<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw
        .and_then(RawNumber::whole)
        .map(|years| u32::try_from(years).unwrap_or(u32::MAX)))
}

fn deserialize_age<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(RawNumber::whole).and_then(|age| u8::try_from(age).ok()))
}

/// Qualitative compatibility tier, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RankTier {
    #[serde(rename = "low compatibility")]
    Low,
    #[serde(rename = "fair compatibility")]
    Fair,
    #[serde(rename = "good compatibility")]
    Good,
    #[serde(rename = "excellent compatibility")]
    Excellent,
}

impl RankTier {
    pub fn label(self) -> &'static str {
        match self {
            RankTier::Low => "low compatibility",
            RankTier::Fair => "fair compatibility",
            RankTier::Good => "good compatibility",
            RankTier::Excellent => "excellent compatibility",
        }
    }
}

impl fmt::Display for RankTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of scoring one instructor/learner pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: u32,
    pub rank: RankTier,
    pub details: Vec<String>,
}

/// Candidate profile together with its score against the acting user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(flatten)]
    pub result: MatchResult,
}

impl RankedCandidate {
    pub fn score(&self) -> u32 {
        self.result.score
    }
}
