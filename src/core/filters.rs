use std::collections::BTreeSet;
use crate::models::Profile;

/// Check if `candidate` belongs in the candidate set of `me`
///
/// Candidates hold the opposite role and are never the acting user,
/// even when the population happens to contain them.
#[inline]
pub fn is_candidate(me: &Profile, candidate: &Profile) -> bool {
    candidate.role == me.role.opposite() && candidate.id != me.id
}

/// Profile attributes in the shape the scoring rules consume
///
/// Absent tag collections become empty sets and blank strings become
/// `None`, so the rules only ever intersect sets and compare options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoringAttributes<'a> {
    pub gym: Option<&'a str>,
    pub specialties: BTreeSet<&'a str>,
    pub target_muscles: BTreeSet<&'a str>,
    pub available_days: BTreeSet<&'a str>,
    pub available_time: Option<&'a str>,
    pub experience: u32,
}

impl<'a> From<&'a Profile> for ScoringAttributes<'a> {
    fn from(profile: &'a Profile) -> Self {
        Self {
            gym: non_blank(profile.gym.as_deref()),
            specialties: tag_set(profile.specialties.as_deref()),
            target_muscles: tag_set(profile.target_muscles.as_deref()),
            available_days: tag_set(profile.available_days.as_deref()),
            available_time: non_blank(profile.available_time.as_deref()),
            experience: profile.experience.unwrap_or(0),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn tag_set(tags: Option<&[String]>) -> BTreeSet<&str> {
    tags.unwrap_or_default().iter().map(String::as_str).collect()
}

/// Number of tags present in both sets
#[inline]
pub fn overlap_count(a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> u32 {
    a.intersection(b).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn tags(values: &[&str]) -> Option<Vec<String>> {
        Some(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_candidate_requires_opposite_role() {
        let me = Profile::new("me", Role::Learner);
        let instructor = Profile::new("t1", Role::Instructor);
        let learner = Profile::new("l1", Role::Learner);

        assert!(is_candidate(&me, &instructor));
        assert!(!is_candidate(&me, &learner));
    }

    #[test]
    fn test_self_is_never_a_candidate() {
        let me = Profile::new("me", Role::Instructor);
        // Same id under the other role is still the acting user
        let mut twin = Profile::new("me", Role::Learner);
        twin.gym = Some("G".to_string());

        assert!(!is_candidate(&me, &me));
        assert!(!is_candidate(&me, &twin));
    }

    #[test]
    fn test_absent_attributes_normalize_to_empty() {
        let profile = Profile::new("x", Role::Instructor);
        let attrs = ScoringAttributes::from(&profile);

        assert_eq!(attrs, ScoringAttributes::default());
    }

    #[test]
    fn test_blank_strings_are_absent() {
        let mut profile = Profile::new("x", Role::Learner);
        profile.gym = Some("   ".to_string());
        profile.available_time = Some(String::new());

        let attrs = ScoringAttributes::from(&profile);
        assert_eq!(attrs.gym, None);
        assert_eq!(attrs.available_time, None);
    }

    #[test]
    fn test_duplicate_tags_count_once() {
        let mut a = Profile::new("a", Role::Instructor);
        a.available_days = tags(&["Mon", "Mon", "Tue"]);
        let mut b = Profile::new("b", Role::Learner);
        b.available_days = tags(&["Mon", "Wed", "Mon"]);

        let a = ScoringAttributes::from(&a);
        let b = ScoringAttributes::from(&b);
        assert_eq!(overlap_count(&a.available_days, &b.available_days), 1);
    }
}
