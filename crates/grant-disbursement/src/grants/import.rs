use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::age::{parse_date, AgeError};
use super::domain::{Household, HouseholdId, NewOccupant};

/// Households and occupants read from a pair of CSV exports.
///
/// Identifiers are the ones found in the export; [`crate::grants::GrantService::seed`]
/// maps them onto the identifiers the repository hands out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HouseholdSnapshot {
    pub households: Vec<Household>,
    pub occupants: Vec<NewOccupant>,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotImportError {
    #[error("failed to read household export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid household CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("occupant row {row}: {source}")]
    Date {
        row: usize,
        #[source]
        source: AgeError,
    },
}

pub struct SnapshotImporter;

impl SnapshotImporter {
    pub fn from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        households: P,
        occupants: Q,
    ) -> Result<HouseholdSnapshot, SnapshotImportError> {
        let households = std::fs::File::open(households)?;
        let occupants = std::fs::File::open(occupants)?;
        Self::from_readers(households, occupants)
    }

    pub fn from_readers<H: Read, O: Read>(
        households: H,
        occupants: O,
    ) -> Result<HouseholdSnapshot, SnapshotImportError> {
        Ok(HouseholdSnapshot {
            households: parse_households(households)?,
            occupants: parse_occupants(occupants)?,
        })
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn parse_households<R: Read>(reader: R) -> Result<Vec<Household>, SnapshotImportError> {
    let mut households = Vec::new();
    for record in csv_reader(reader).deserialize::<HouseholdRow>() {
        let row = record?;
        households.push(Household {
            household_id: HouseholdId(row.household_id),
            housing_type: row.housing_type,
        });
    }
    Ok(households)
}

fn parse_occupants<R: Read>(reader: R) -> Result<Vec<NewOccupant>, SnapshotImportError> {
    let mut occupants = Vec::new();
    for (index, record) in csv_reader(reader).deserialize::<OccupantRow>().enumerate() {
        let row = record?;
        // header is line 1
        let dob = parse_date(&row.dob).map_err(|source| SnapshotImportError::Date {
            row: index + 2,
            source,
        })?;

        occupants.push(NewOccupant {
            household_id: HouseholdId(row.household_id),
            name: row.name,
            gender: row.gender,
            marital_status: row.marital_status,
            spouse: row.spouse,
            occupation_type: row.occupation_type,
            annual_income: row.annual_income,
            dob,
        });
    }
    Ok(occupants)
}

#[derive(Debug, Deserialize)]
struct HouseholdRow {
    household_id: u64,
    housing_type: String,
}

#[derive(Debug, Deserialize)]
struct OccupantRow {
    household_id: u64,
    name: String,
    gender: String,
    marital_status: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    spouse: Option<String>,
    occupation_type: String,
    #[serde(default)]
    annual_income: Option<i64>,
    dob: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
