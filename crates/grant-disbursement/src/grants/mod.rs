//! Household registry and grant eligibility.
//!
//! Households and occupants are held behind [`HouseholdRepository`]; the grant rules are
//! pure functions evaluated over a fresh snapshot for every query.

pub mod age;
pub mod aggregate;
pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use age::{age_in_years, AgeError};
pub use aggregate::{group_by_household, total_income};
pub use domain::{
    Household, HouseholdId, HouseholdMembers, HousingType, NewHousehold, NewOccupant, Occupant,
    OccupantId, STUDENT_OCCUPATION,
};
pub use import::{HouseholdSnapshot, SnapshotImportError, SnapshotImporter};
pub use repository::{HouseholdRepository, RepositoryError};
pub use router::grant_router;
pub use rules::{GrantScheme, QualifyingHousehold, UnknownGrantScheme};
pub use service::{GrantService, GrantServiceError};
pub use views::{HouseholdView, OccupantView};
