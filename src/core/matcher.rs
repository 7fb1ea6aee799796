use crate::models::{Profile, RankedCandidate};
use crate::core::{filters::is_candidate, pairing::Participant};

/// Result of the ranking process
#[derive(Debug)]
pub struct RankingResult {
    pub matches: Vec<RankedCandidate>,
    pub total_candidates: usize,
}

/// Main ranking orchestrator - scores every eligible candidate for a user
///
/// # Pipeline Stages
/// 1. Role/self filtering
/// 2. Pairwise scoring (instructor always scored first)
/// 3. Ordering by score descending, then id ascending
/// 4. Optional truncation
///
/// Holds no state; every call is a pure function of its arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher;

impl Matcher {
    pub fn new() -> Self {
        Self
    }

    /// Rank every candidate in `population` for `me`
    pub fn rank(&self, me: &Profile, population: &[Profile]) -> Vec<RankedCandidate> {
        self.rank_with_limit(me, population, usize::MAX).matches
    }

    /// Rank candidates for `me` and keep at most `limit` of them
    ///
    /// # Arguments
    /// * `me` - The acting user's profile
    /// * `population` - Every other profile known to the store
    /// * `limit` - Maximum number of matches to return
    ///
    /// # Returns
    /// RankingResult holding the ordered matches and the size of the
    /// candidate set before truncation
    pub fn rank_with_limit(
        &self,
        me: &Profile,
        population: &[Profile],
        limit: usize,
    ) -> RankingResult {
        let acting = Participant::from(me);

        let mut ranked: Vec<RankedCandidate> = population
            .iter()
            // Stage 1: opposite role, never self
            .filter(|candidate| is_candidate(me, candidate))
            // Stage 2: score against the acting user
            .filter_map(|candidate| {
                match acting.score_against(&Participant::from(candidate)) {
                    Ok(result) => Some(RankedCandidate {
                        profile: candidate.clone(),
                        result,
                    }),
                    Err(e) => {
                        tracing::warn!("Skipping candidate {}: {}", candidate.id, e);
                        None
                    }
                }
            })
            .collect();

        let total_candidates = ranked.len();

        // Stage 3: score descending, ties by id ascending. The sort is stable,
        // so duplicate ids keep population order.
        ranked.sort_by(|a, b| {
            b.score()
                .cmp(&a.score())
                .then_with(|| a.profile.id.cmp(&b.profile.id))
        });

        // Stage 4: limit results
        ranked.truncate(limit);

        tracing::debug!(
            "Ranked {} {} candidates for {} ({} returned)",
            total_candidates,
            me.role.opposite(),
            me.id,
            ranked.len()
        );

        RankingResult {
            matches: ranked,
            total_candidates,
        }
    }
}
