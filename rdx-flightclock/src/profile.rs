//! The craft profile consumed by the countdown engine.

use crate::common::{CUSTOM_PROFILE_ID, SECONDS_PER_MINUTE};
use crate::error::ProfileError;
use serde::{Deserialize, Serialize};

/// A craft with a known flight-time budget.
///
/// Profiles can only be built through [`CraftProfile::new`] (or deserialized,
/// which goes through the same checks), so an engine never sees an empty name
/// or a zero duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProfileRecord")]
pub struct CraftProfile {
    id: String,
    name: String,
    flight_time_seconds: u32,
}

/// Unvalidated wire shape of a [`CraftProfile`].
#[derive(Deserialize)]
struct ProfileRecord {
    id: String,
    name: String,
    flight_time_seconds: u32,
}

impl TryFrom<ProfileRecord> for CraftProfile {
    type Error = ProfileError;

    fn try_from(record: ProfileRecord) -> Result<Self, Self::Error> {
        CraftProfile::new(record.id, record.name, record.flight_time_seconds)
    }
}

impl CraftProfile {
    /// Builds a validated profile.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        flight_time_seconds: u32,
    ) -> Result<Self, ProfileError> {
        let profile = Self {
            id: id.into(),
            name: name.into(),
            flight_time_seconds,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Synthesizes the reserved custom-duration profile for `minutes` minutes.
    pub fn custom(minutes: u32) -> Result<Self, ProfileError> {
        let seconds = minutes
            .checked_mul(SECONDS_PER_MINUTE)
            .ok_or(ProfileError::ZeroDuration)?;
        Self::new(CUSTOM_PROFILE_ID, CUSTOM_PROFILE_ID, seconds)
    }

    /// Re-checks the profile invariants.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.id.trim().is_empty() {
            return Err(ProfileError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if self.flight_time_seconds == 0 {
            return Err(ProfileError::ZeroDuration);
        }
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flight_time_seconds(&self) -> u32 {
        self.flight_time_seconds
    }

    /// Whether this is the synthesized custom-duration profile.
    pub fn is_custom(&self) -> bool {
        self.id == CUSTOM_PROFILE_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_name_and_zero_duration() {
        assert_eq!(
            CraftProfile::new("x", "  ", 60).unwrap_err(),
            ProfileError::EmptyName
        );
        assert_eq!(
            CraftProfile::new("x", "Tello", 0).unwrap_err(),
            ProfileError::ZeroDuration
        );
        assert_eq!(
            CraftProfile::new("", "Tello", 60).unwrap_err(),
            ProfileError::EmptyId
        );
    }

    #[test]
    fn custom_profile_uses_reserved_id() {
        let profile = CraftProfile::custom(5).unwrap();
        assert_eq!(profile.id(), "LIBERO");
        assert_eq!(profile.name(), "LIBERO");
        assert_eq!(profile.flight_time_seconds(), 300);
        assert!(profile.is_custom());
        assert_eq!(CraftProfile::custom(0).unwrap_err(), ProfileError::ZeroDuration);
    }

    #[test]
    fn deserialization_goes_through_validation() {
        let source = config::Config::builder()
            .set_override("id", "bad")
            .and_then(|b| b.set_override("name", ""))
            .and_then(|b| b.set_override("flight_time_seconds", 60i64))
            .and_then(|b| b.build())
            .unwrap();
        assert!(source.try_deserialize::<CraftProfile>().is_err());
    }
}
