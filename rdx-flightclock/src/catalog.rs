//! A read-only catalog of craft profiles.
//!
//! Editing and persisting the catalog belong to the application layer; the
//! engine only needs to list profiles and resolve a selection into a profile,
//! including the synthesized custom-duration entry.

use crate::common::CUSTOM_PROFILE_ID;
use crate::error::CatalogError;
use crate::profile::CraftProfile;
use std::collections::HashSet;

/// An ordered set of craft profiles with unique ids.
#[derive(Debug, Clone)]
pub struct Catalog {
    profiles: Vec<CraftProfile>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate ids and the reserved custom id.
    pub fn new(profiles: Vec<CraftProfile>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for profile in &profiles {
            if profile.is_custom() || !seen.insert(profile.id()) {
                return Err(CatalogError::DuplicateId(profile.id().to_string()));
            }
        }
        Ok(Self { profiles })
    }

    pub fn get(&self, id: &str) -> Option<&CraftProfile> {
        self.profiles.iter().find(|p| p.id() == id)
    }

    /// Resolves a selection into a profile ready to start.
    ///
    /// The reserved `LIBERO` id synthesizes a custom profile of
    /// `custom_minutes`; every other id must exist in the catalog.
    pub fn select(&self, id: &str, custom_minutes: u32) -> Result<CraftProfile, CatalogError> {
        if id == CUSTOM_PROFILE_ID {
            return Ok(CraftProfile::custom(custom_minutes)?);
        }
        self.get(id)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownId(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CraftProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            profiles: default_fleet(),
        }
    }
}

/// The fleet a fresh installation starts with.
pub fn default_fleet() -> Vec<CraftProfile> {
    [
        ("dji-mini-3", "DJI Mini 3 Pro", 1800),
        ("dji-mavic-3", "DJI Mavic 3", 2700),
        ("autel-evo-2", "Autel Evo II Pro", 2400),
        ("dji-air-2s", "DJI Air 2S", 1860),
        ("parrot-anafi", "Parrot Anafi", 1500),
        ("skydio-2", "Skydio 2", 1380),
        ("dji-fpv", "DJI FPV", 1200),
        ("yuneec-typhoon", "Yuneec Typhoon H", 1500),
        ("ryze-tello", "Ryze Tello", 780),
        ("hubsan-zino", "Hubsan Zino Pro", 1380),
    ]
    .into_iter()
    .filter_map(|(id, name, secs)| CraftProfile::new(id, name, secs).ok())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProfileError;

    #[test]
    fn default_fleet_is_complete() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.get("ryze-tello").unwrap().flight_time_seconds(), 780);
    }

    #[test]
    fn select_resolves_custom_and_catalog_ids() {
        let catalog = Catalog::default();
        let custom = catalog.select("LIBERO", 15).unwrap();
        assert_eq!(custom.flight_time_seconds(), 900);
        assert!(catalog.get("LIBERO").is_none());

        let mavic = catalog.select("dji-mavic-3", 15).unwrap();
        assert_eq!(mavic.name(), "DJI Mavic 3");

        assert_eq!(
            catalog.select("nope", 15).unwrap_err(),
            CatalogError::UnknownId("nope".into())
        );
        assert_eq!(
            catalog.select("LIBERO", 0).unwrap_err(),
            CatalogError::InvalidProfile(ProfileError::ZeroDuration)
        );
    }

    #[test]
    fn rejects_duplicates_and_reserved_id() {
        let a = CraftProfile::new("a", "A", 60).unwrap();
        assert!(Catalog::new(vec![a.clone(), a]).is_err());
        let reserved = CraftProfile::custom(1).unwrap();
        assert!(Catalog::new(vec![reserved]).is_err());
    }
}
