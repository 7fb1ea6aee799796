use crate::core::filters::overlap_count;
use crate::core::pairing::{Instructor, Learner};
use crate::models::{MatchResult, RankTier};

/// Points per target muscle group the instructor specializes in
pub const MUSCLE_MATCH_POINTS: u32 = 15;
/// Points for training at the same gym
pub const SAME_GYM_POINTS: u32 = 25;
/// Points per weekday both parties are available
pub const DAY_OVERLAP_POINTS: u32 = 8;
/// Points for sharing a time-of-day band
pub const TIME_BAND_POINTS: u32 = 20;
/// Points for an instructor with at least `EXPERIENCED_YEARS` of experience
pub const EXPERIENCE_POINTS: u32 = 10;
pub const EXPERIENCED_YEARS: u32 = 3;

/// Calculate the compatibility score for an instructor/learner pair
///
/// Scoring formula (uncapped):
/// score = (
///     15 * shared muscle groups +   # learner targets vs instructor specialties
///     25 * same gym +
///     8  * shared available days +
///     20 * same time band +
///     10 * experience >= 3 years
/// )
///
/// `details` holds one line per factor that contributed, in the order above.
pub fn calculate_match_score(instructor: &Instructor<'_>, learner: &Learner<'_>) -> MatchResult {
    let i = instructor.attributes();
    let l = learner.attributes();

    let mut score = 0;
    let mut details = Vec::new();

    // Factor 1: muscle groups
    let muscle_matches = overlap_count(&l.target_muscles, &i.specialties);
    if muscle_matches > 0 {
        let points = muscle_matches * MUSCLE_MATCH_POINTS;
        score += points;
        details.push(format!(
            "{} target muscle group{} matched +{}",
            muscle_matches,
            plural(muscle_matches),
            points
        ));
    }

    // Factor 2: same gym
    if matches!((i.gym, l.gym), (Some(a), Some(b)) if a == b) {
        score += SAME_GYM_POINTS;
        details.push(format!("same gym +{}", SAME_GYM_POINTS));
    }

    // Factor 3: available days
    let day_matches = overlap_count(&l.available_days, &i.available_days);
    if day_matches > 0 {
        let points = day_matches * DAY_OVERLAP_POINTS;
        score += points;
        details.push(format!(
            "{} available day{} in common +{}",
            day_matches,
            plural(day_matches),
            points
        ));
    }

    // Factor 4: time band
    if matches!((i.available_time, l.available_time), (Some(a), Some(b)) if a == b) {
        score += TIME_BAND_POINTS;
        details.push(format!("same time band +{}", TIME_BAND_POINTS));
    }

    // Factor 5: experienced instructor
    if i.experience >= EXPERIENCED_YEARS {
        score += EXPERIENCE_POINTS;
        details.push(format!("experienced instructor +{}", EXPERIENCE_POINTS));
    }

    MatchResult {
        score,
        rank: rank_tier(score),
        details,
    }
}

/// Map a score onto its compatibility tier
#[inline]
pub fn rank_tier(score: u32) -> RankTier {
    match score {
        70.. => RankTier::Excellent,
        50.. => RankTier::Good,
        30.. => RankTier::Fair,
        _ => RankTier::Low,
    }
}

#[inline]
fn plural(count: u32) -> &'static str {
    if count == 1 { "" } else { "s" }
}
