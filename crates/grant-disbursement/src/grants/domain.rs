use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::age::parse_date;

/// Identifier assigned to a household by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HouseholdId(pub u64);

impl fmt::Display for HouseholdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier assigned to an occupant by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OccupantId(pub u64);

impl fmt::Display for OccupantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Housing types offered by the intake form. Storage keeps the raw string, so other
/// values are accepted and simply never match the HDB-only schemes.
pub struct HousingType;

impl HousingType {
    pub const LANDED: &'static str = "Landed";
    pub const CONDOMINIUM: &'static str = "Condominium";
    pub const HDB: &'static str = "HDB";
}

/// Occupation value the student scheme looks for.
pub const STUDENT_OCCUPATION: &str = "Student";

/// One physical housing unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household {
    pub household_id: HouseholdId,
    pub housing_type: String,
}

impl Household {
    pub fn is_hdb(&self) -> bool {
        self.housing_type == HousingType::HDB
    }
}

/// A person living in a household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub uuid: OccupantId,
    pub household_id: HouseholdId,
    pub name: String,
    pub gender: String,
    pub marital_status: String,
    pub spouse: Option<String>,
    pub occupation_type: String,
    pub annual_income: Option<i64>,
    pub dob: NaiveDate,
}

impl Occupant {
    pub fn is_student(&self) -> bool {
        self.occupation_type == STUDENT_OCCUPATION
    }
}

/// Payload accepted when registering a household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHousehold {
    pub housing_type: String,
}

/// Payload accepted when adding a family member to an existing household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOccupant {
    pub household_id: HouseholdId,
    pub name: String,
    pub gender: String,
    pub marital_status: String,
    #[serde(default)]
    pub spouse: Option<String>,
    pub occupation_type: String,
    #[serde(default)]
    pub annual_income: Option<i64>,
    #[serde(deserialize_with = "deserialize_date")]
    pub dob: NaiveDate,
}

impl NewOccupant {
    /// Attach the repository-assigned identifier.
    pub fn into_occupant(self, uuid: OccupantId) -> Occupant {
        Occupant {
            uuid,
            household_id: self.household_id,
            name: self.name,
            gender: self.gender,
            marital_status: self.marital_status,
            spouse: self.spouse,
            occupation_type: self.occupation_type,
            annual_income: self.annual_income,
            dob: self.dob,
        }
    }
}

/// A household together with a list of its occupants.
///
/// For plain lookups `members` holds every occupant; grant queries narrow it down to the
/// occupants relevant to the scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseholdMembers {
    pub household: Household,
    pub members: Vec<Occupant>,
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}
