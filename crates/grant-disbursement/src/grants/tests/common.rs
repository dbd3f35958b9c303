use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Months, NaiveDate};
use serde_json::Value;

use crate::grants::domain::{
    Household, HouseholdId, HousingType, NewHousehold, NewOccupant, Occupant, OccupantId,
};
use crate::grants::repository::{HouseholdRepository, RepositoryError};
use crate::grants::service::GrantService;

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 14).expect("valid date")
}

/// Date of birth giving an age of `years` on [`as_of`], birthday already passed.
pub(super) fn born_years_ago(years: u32) -> NaiveDate {
    as_of()
        .checked_sub_months(Months::new(years * 12))
        .expect("valid date")
}

pub(super) fn born_months_ago(months: u32) -> NaiveDate {
    as_of()
        .checked_sub_months(Months::new(months))
        .expect("valid date")
}

pub(super) fn household(id: u64, housing_type: &str) -> Household {
    Household {
        household_id: HouseholdId(id),
        housing_type: housing_type.to_string(),
    }
}

pub(super) fn hdb(id: u64) -> Household {
    household(id, HousingType::HDB)
}

pub(super) fn occupant(
    uuid: u64,
    household: u64,
    occupation: &str,
    income: Option<i64>,
    dob: NaiveDate,
) -> Occupant {
    Occupant {
        uuid: OccupantId(uuid),
        household_id: HouseholdId(household),
        name: format!("occupant-{uuid}"),
        gender: "Female".to_string(),
        marital_status: "Single".to_string(),
        spouse: None,
        occupation_type: occupation.to_string(),
        annual_income: income,
        dob,
    }
}

pub(super) fn new_member(household: HouseholdId, name: &str, dob: NaiveDate) -> NewOccupant {
    NewOccupant {
        household_id: household,
        name: name.to_string(),
        gender: "Male".to_string(),
        marital_status: "Single".to_string(),
        spouse: None,
        occupation_type: "Employed".to_string(),
        annual_income: Some(30_000),
        dob,
    }
}

pub(super) fn uuids(members: &[Occupant]) -> Vec<u64> {
    members.iter().map(|occupant| occupant.uuid.0).collect()
}

#[derive(Default)]
struct MemoryState {
    households: BTreeMap<HouseholdId, Household>,
    occupants: BTreeMap<OccupantId, Occupant>,
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl HouseholdRepository for MemoryRepository {
    fn create_household(&self, household: NewHousehold) -> Result<HouseholdId, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        let id = HouseholdId(guard.households.len() as u64 + 1);
        guard.households.insert(
            id,
            Household {
                household_id: id,
                housing_type: household.housing_type,
            },
        );
        Ok(id)
    }

    fn create_occupant(&self, occupant: NewOccupant) -> Result<OccupantId, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        if !guard.households.contains_key(&occupant.household_id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "household {} does not exist",
                occupant.household_id
            )));
        }
        let uuid = OccupantId(guard.occupants.len() as u64 + 1);
        guard.occupants.insert(uuid, occupant.into_occupant(uuid));
        Ok(uuid)
    }

    fn households(&self) -> Result<Vec<Household>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.households.values().cloned().collect())
    }

    fn household(&self, id: HouseholdId) -> Result<Option<Household>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.households.get(&id).cloned())
    }

    fn occupants(&self) -> Result<Vec<Occupant>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.occupants.values().cloned().collect())
    }

    fn occupants_of(&self, id: HouseholdId) -> Result<Vec<Occupant>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard
            .occupants
            .values()
            .filter(|occupant| occupant.household_id == id)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl HouseholdRepository for UnavailableRepository {
    fn create_household(&self, _household: NewHousehold) -> Result<HouseholdId, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn create_occupant(&self, _occupant: NewOccupant) -> Result<OccupantId, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn households(&self) -> Result<Vec<Household>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn household(&self, _id: HouseholdId) -> Result<Option<Household>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn occupants(&self) -> Result<Vec<Occupant>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn occupants_of(&self, _id: HouseholdId) -> Result<Vec<Occupant>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (GrantService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = GrantService::new(repository.clone());
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
