use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{HouseholdId, HouseholdMembers, Occupant, OccupantId};
use super::rules::QualifyingHousehold;

/// Response body for a household and its listed members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HouseholdView {
    pub household_id: HouseholdId,
    pub housing_type: String,
    pub members: Vec<OccupantView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccupantView {
    pub uuid: OccupantId,
    pub household_id: HouseholdId,
    pub name: String,
    pub gender: String,
    pub marital_status: String,
    pub spouse: Option<String>,
    pub occupation_type: String,
    pub annual_income: Option<i64>,
    #[serde(serialize_with = "serialize_date")]
    pub dob: NaiveDate,
}

impl From<Occupant> for OccupantView {
    fn from(occupant: Occupant) -> Self {
        Self {
            uuid: occupant.uuid,
            household_id: occupant.household_id,
            name: occupant.name,
            gender: occupant.gender,
            marital_status: occupant.marital_status,
            spouse: occupant.spouse,
            occupation_type: occupant.occupation_type,
            annual_income: occupant.annual_income,
            dob: occupant.dob,
        }
    }
}

impl From<HouseholdMembers> for HouseholdView {
    fn from(value: HouseholdMembers) -> Self {
        Self {
            household_id: value.household.household_id,
            housing_type: value.household.housing_type,
            members: value.members.into_iter().map(OccupantView::from).collect(),
        }
    }
}

impl From<QualifyingHousehold> for HouseholdView {
    fn from(value: QualifyingHousehold) -> Self {
        Self {
            household_id: value.household.household_id,
            housing_type: value.household.housing_type,
            members: value
                .matched_members
                .into_iter()
                .map(OccupantView::from)
                .collect(),
        }
    }
}

fn serialize_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&date.format("%Y-%m-%d"))
}
