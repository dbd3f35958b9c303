use chrono::NaiveDate;
use grant_disbursement::grants::{
    age, Household, HouseholdId, HouseholdRepository, NewHousehold, NewOccupant, Occupant,
    OccupantId, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Tables {
    households: BTreeMap<HouseholdId, Household>,
    occupants: BTreeMap<OccupantId, Occupant>,
    next_household: u64,
    next_occupant: u64,
}

/// Process-local household store. Ids start at 1 and are never reused.
#[derive(Default, Clone)]
pub(crate) struct InMemoryHouseholdRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryHouseholdRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("household store poisoned".to_string()))
    }
}

impl HouseholdRepository for InMemoryHouseholdRepository {
    fn create_household(&self, household: NewHousehold) -> Result<HouseholdId, RepositoryError> {
        let mut tables = self.lock()?;
        tables.next_household += 1;
        let id = HouseholdId(tables.next_household);
        tables.households.insert(
            id,
            Household {
                household_id: id,
                housing_type: household.housing_type,
            },
        );
        Ok(id)
    }

    fn create_occupant(&self, occupant: NewOccupant) -> Result<OccupantId, RepositoryError> {
        let mut tables = self.lock()?;
        if !tables.households.contains_key(&occupant.household_id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "household {} does not exist",
                occupant.household_id
            )));
        }
        tables.next_occupant += 1;
        let uuid = OccupantId(tables.next_occupant);
        tables.occupants.insert(uuid, occupant.into_occupant(uuid));
        Ok(uuid)
    }

    fn households(&self) -> Result<Vec<Household>, RepositoryError> {
        Ok(self.lock()?.households.values().cloned().collect())
    }

    fn household(&self, id: HouseholdId) -> Result<Option<Household>, RepositoryError> {
        Ok(self.lock()?.households.get(&id).cloned())
    }

    fn occupants(&self) -> Result<Vec<Occupant>, RepositoryError> {
        Ok(self.lock()?.occupants.values().cloned().collect())
    }

    fn occupants_of(&self, id: HouseholdId) -> Result<Vec<Occupant>, RepositoryError> {
        Ok(self
            .lock()?
            .occupants
            .values()
            .filter(|occupant| occupant.household_id == id)
            .cloned()
            .collect())
    }
}

/// Clap value parser for `--as-of`, reusing the library's date format.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    age::parse_date(raw).map_err(|err| err.to_string())
}
