use super::domain::{Household, HouseholdId, NewHousehold, NewOccupant, Occupant, OccupantId};

/// Storage abstraction over households and their occupants.
///
/// Implementations assign identifiers and enforce that occupants reference an existing
/// household. Reads return snapshots; the grant engine never mutates them.
pub trait HouseholdRepository: Send + Sync {
    fn create_household(&self, household: NewHousehold) -> Result<HouseholdId, RepositoryError>;
    fn create_occupant(&self, occupant: NewOccupant) -> Result<OccupantId, RepositoryError>;
    fn households(&self) -> Result<Vec<Household>, RepositoryError>;
    fn household(&self, id: HouseholdId) -> Result<Option<Household>, RepositoryError>;
    fn occupants(&self) -> Result<Vec<Occupant>, RepositoryError>;
    fn occupants_of(&self, id: HouseholdId) -> Result<Vec<Occupant>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
