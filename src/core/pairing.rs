use thiserror::Error;
use crate::core::filters::ScoringAttributes;
use crate::core::scoring::calculate_match_score;
use crate::models::{MatchResult, Profile, Role};

/// Contract violations at the engine boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("profile {id} has role {found}, expected {expected}")]
    RoleMismatch {
        id: String,
        expected: Role,
        found: Role,
    },

    #[error("cannot pair profiles {first} and {second}: both are {role}s")]
    SameRole {
        first: String,
        second: String,
        role: Role,
    },
}

/// A profile known to hold the instructor role
#[derive(Debug, Clone)]
pub struct Instructor<'a> {
    profile: &'a Profile,
    attrs: ScoringAttributes<'a>,
}

/// A profile known to hold the learner role
#[derive(Debug, Clone)]
pub struct Learner<'a> {
    profile: &'a Profile,
    attrs: ScoringAttributes<'a>,
}

impl<'a> Instructor<'a> {
    pub fn profile(&self) -> &'a Profile {
        self.profile
    }

    pub fn attributes(&self) -> &ScoringAttributes<'a> {
        &self.attrs
    }
}

impl<'a> Learner<'a> {
    pub fn profile(&self) -> &'a Profile {
        self.profile
    }

    pub fn attributes(&self) -> &ScoringAttributes<'a> {
        &self.attrs
    }
}

impl<'a> TryFrom<&'a Profile> for Instructor<'a> {
    type Error = MatchError;

    fn try_from(profile: &'a Profile) -> Result<Self, Self::Error> {
        match profile.role {
            Role::Instructor => Ok(Self {
                profile,
                attrs: ScoringAttributes::from(profile),
            }),
            found => Err(MatchError::RoleMismatch {
                id: profile.id.clone(),
                expected: Role::Instructor,
                found,
            }),
        }
    }
}

impl<'a> TryFrom<&'a Profile> for Learner<'a> {
    type Error = MatchError;

    fn try_from(profile: &'a Profile) -> Result<Self, Self::Error> {
        match profile.role {
            Role::Learner => Ok(Self {
                profile,
                attrs: ScoringAttributes::from(profile),
            }),
            found => Err(MatchError::RoleMismatch {
                id: profile.id.clone(),
                expected: Role::Learner,
                found,
            }),
        }
    }
}

/// A profile dispatched on its role
#[derive(Debug, Clone)]
pub enum Participant<'a> {
    Instructor(Instructor<'a>),
    Learner(Learner<'a>),
}

impl<'a> From<&'a Profile> for Participant<'a> {
    fn from(profile: &'a Profile) -> Self {
        let attrs = ScoringAttributes::from(profile);
        match profile.role {
            Role::Instructor => Participant::Instructor(Instructor { profile, attrs }),
            Role::Learner => Participant::Learner(Learner { profile, attrs }),
        }
    }
}

impl<'a> Participant<'a> {
    pub fn profile(&self) -> &'a Profile {
        match self {
            Participant::Instructor(instructor) => instructor.profile(),
            Participant::Learner(learner) => learner.profile(),
        }
    }

    /// Score this participant against `other`, instructor first
    pub fn score_against(&self, other: &Participant<'a>) -> Result<MatchResult, MatchError> {
        match (self, other) {
            (Participant::Instructor(instructor), Participant::Learner(learner))
            | (Participant::Learner(learner), Participant::Instructor(instructor)) => {
                Ok(calculate_match_score(instructor, learner))
            }
            _ => Err(MatchError::SameRole {
                first: self.profile().id.clone(),
                second: other.profile().id.clone(),
                role: self.profile().role,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instructor_requires_instructor_role() {
        let learner = Profile::new("l1", Role::Learner);
        let err = Instructor::try_from(&learner).unwrap_err();

        assert_eq!(
            err,
            MatchError::RoleMismatch {
                id: "l1".to_string(),
                expected: Role::Instructor,
                found: Role::Learner,
            }
        );
        assert_eq!(err.to_string(), "profile l1 has role learner, expected instructor");
    }

    #[test]
    fn test_learner_requires_learner_role() {
        let instructor = Profile::new("t1", Role::Instructor);
        assert!(Learner::try_from(&instructor).is_err());
        assert!(Instructor::try_from(&instructor).is_ok());
    }

    #[test]
    fn test_score_against_is_symmetric() {
        let mut instructor = Profile::new("t1", Role::Instructor);
        instructor.gym = Some("G".to_string());
        let mut learner = Profile::new("l1", Role::Learner);
        learner.gym = Some("G".to_string());

        let i = Participant::from(&instructor);
        let l = Participant::from(&learner);

        assert_eq!(i.score_against(&l), l.score_against(&i));
        assert_eq!(i.score_against(&l).unwrap().score, 25);
    }

    #[test]
    fn test_same_role_pair_is_rejected() {
        let a = Profile::new("a", Role::Learner);
        let b = Profile::new("b", Role::Learner);

        let err = Participant::from(&a)
            .score_against(&Participant::from(&b))
            .unwrap_err();
        assert!(matches!(err, MatchError::SameRole { role: Role::Learner, .. }));
    }

    #[test]
    fn test_wrappers_expose_source_profile() {
        let instructor = Profile::new("t1", Role::Instructor);
        let learner = Profile::new("l1", Role::Learner);

        assert_eq!(Instructor::try_from(&instructor).unwrap().profile().id, "t1");
        assert_eq!(Learner::try_from(&learner).unwrap().profile().id, "l1");
        assert_eq!(Participant::from(&learner).profile().id, "l1");
    }
}
