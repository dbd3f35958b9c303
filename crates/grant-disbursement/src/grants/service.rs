use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use super::aggregate::group_by_household;
use super::domain::{
    HouseholdId, HouseholdMembers, NewHousehold, NewOccupant, OccupantId,
};
use super::import::HouseholdSnapshot;
use super::repository::{HouseholdRepository, RepositoryError};
use super::rules::{GrantScheme, QualifyingHousehold};

/// Facade over the household repository and the grant rules.
///
/// Every query reads a fresh snapshot from the repository; nothing computed here is
/// stored. Queries that match nothing return an empty list rather than an error.
pub struct GrantService<R> {
    repository: Arc<R>,
}

impl<R> Clone for GrantService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<R> GrantService<R>
where
    R: HouseholdRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn create_household(
        &self,
        household: NewHousehold,
    ) -> Result<HouseholdId, GrantServiceError> {
        let housing_type = household.housing_type.clone();
        let id = self.repository.create_household(household)?;
        info!(household_id = %id, %housing_type, "household created");
        Ok(id)
    }

    /// Add a family member to an existing household.
    pub fn add_member(&self, member: NewOccupant) -> Result<OccupantId, GrantServiceError> {
        validate_member(&member, Local::now().date_naive())?;
        let household_id = member.household_id;
        let uuid = self.repository.create_occupant(member)?;
        info!(%household_id, %uuid, "member added to household");
        Ok(uuid)
    }

    /// Every household with all of its members, ordered by household id.
    pub fn list_households(&self) -> Result<Vec<HouseholdMembers>, GrantServiceError> {
        let mut households = self.repository.households()?;
        households.sort_by_key(|household| household.household_id);
        let mut groups = group_by_household(&self.repository.occupants()?);

        let listing: Vec<HouseholdMembers> = households
            .into_iter()
            .map(|household| HouseholdMembers {
                members: groups.remove(&household.household_id).unwrap_or_default(),
                household,
            })
            .collect();

        debug!(count = listing.len(), "listed households");
        Ok(listing)
    }

    /// The household with the given id, if it exists, with all of its members.
    pub fn household(&self, id: HouseholdId) -> Result<Vec<HouseholdMembers>, GrantServiceError> {
        let Some(household) = self.repository.household(id)? else {
            debug!(household_id = %id, "household not found");
            return Ok(Vec::new());
        };

        let mut members = self.repository.occupants_of(id)?;
        members.sort_by_key(|occupant| occupant.uuid);
        Ok(vec![HouseholdMembers { household, members }])
    }

    /// Households qualifying for `scheme` as of the given date.
    pub fn grant(
        &self,
        scheme: GrantScheme,
        as_of: NaiveDate,
    ) -> Result<Vec<QualifyingHousehold>, GrantServiceError> {
        let households = self.repository.households()?;
        let occupants = self.repository.occupants()?;
        let qualifying = scheme.evaluate(&households, &occupants, as_of);

        debug!(
            %scheme,
            %as_of,
            households = households.len(),
            occupants = occupants.len(),
            qualifying = qualifying.len(),
            "grant evaluated"
        );
        Ok(qualifying)
    }

    /// Load an imported snapshot, creating each household and its occupants.
    ///
    /// Household ids in the snapshot only link rows together; the stored records get
    /// fresh ids from the repository. Returns the number of households and occupants created.
    pub fn seed(&self, snapshot: HouseholdSnapshot) -> Result<(usize, usize), GrantServiceError> {
        let HouseholdSnapshot {
            households,
            occupants,
        } = snapshot;

        let mut assigned: HashMap<HouseholdId, HouseholdId> = HashMap::new();
        for household in households {
            let source_id = household.household_id;
            if assigned.contains_key(&source_id) {
                return Err(GrantServiceError::InvalidInput(format!(
                    "household {source_id} appears more than once in the snapshot"
                )));
            }
            let id = self.repository.create_household(NewHousehold {
                housing_type: household.housing_type,
            })?;
            assigned.insert(source_id, id);
        }

        let today = Local::now().date_naive();
        let mut created_occupants = 0;
        for mut occupant in occupants {
            validate_member(&occupant, today)?;
            let Some(id) = assigned.get(&occupant.household_id) else {
                return Err(GrantServiceError::InvalidInput(format!(
                    "occupant {} references unknown household {}",
                    occupant.name, occupant.household_id
                )));
            };
            occupant.household_id = *id;
            self.repository.create_occupant(occupant)?;
            created_occupants += 1;
        }

        info!(
            households = assigned.len(),
            occupants = created_occupants,
            "household snapshot loaded"
        );
        Ok((assigned.len(), created_occupants))
    }
}

fn validate_member(member: &NewOccupant, today: NaiveDate) -> Result<(), GrantServiceError> {
    if member.name.trim().is_empty() {
        return Err(GrantServiceError::InvalidInput(
            "name must not be blank".to_string(),
        ));
    }
    if let Some(income) = member.annual_income.filter(|income| *income < 0) {
        return Err(GrantServiceError::InvalidInput(format!(
            "annual income {income} must not be negative"
        )));
    }
    if member.dob > today {
        return Err(GrantServiceError::InvalidInput(format!(
            "date of birth {} is in the future",
            member.dob
        )));
    }
    Ok(())
}

/// Error raised by the grant service.
#[derive(Debug, thiserror::Error)]
pub enum GrantServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for GrantServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::ConstraintViolation(detail) => Self::InvalidInput(detail),
            other => Self::Repository(other),
        }
    }
}
