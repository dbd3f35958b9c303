use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::age::age_in_years;
use super::aggregate::{group_by_household, total_income};
use super::domain::{Household, HouseholdId, Occupant};

const STUDENT_AGE_LIMIT: u32 = 16;
const STUDENT_INCOME_CEILING: i64 = 200_000;
const MULTIGENERATION_INCOME_CEILING: i64 = 150_000;
const MULTIGENERATION_YOUTH_LIMIT: u32 = 18;
const ELDER_AGE: u32 = 55;
const BABY_WINDOW_MONTHS: u32 = 8;
const YOLO_INCOME_CEILING: i64 = 100_000;

/// The fixed set of grants the engine knows how to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrantScheme {
    StudentEncouragementBonus,
    MultigenerationScheme,
    ElderBonus,
    BabySunshineGrant,
    YoloGstGrant,
}

impl GrantScheme {
    pub const ALL: [GrantScheme; 5] = [
        GrantScheme::StudentEncouragementBonus,
        GrantScheme::MultigenerationScheme,
        GrantScheme::ElderBonus,
        GrantScheme::BabySunshineGrant,
        GrantScheme::YoloGstGrant,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            GrantScheme::StudentEncouragementBonus => "student-encouragement-bonus",
            GrantScheme::MultigenerationScheme => "multigeneration-scheme",
            GrantScheme::ElderBonus => "elder-bonus",
            GrantScheme::BabySunshineGrant => "baby-sunshine-grant",
            GrantScheme::YoloGstGrant => "yolo-gst-grant",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GrantScheme::StudentEncouragementBonus => "Student Encouragement Bonus",
            GrantScheme::MultigenerationScheme => "Multigeneration Scheme",
            GrantScheme::ElderBonus => "Elder Bonus",
            GrantScheme::BabySunshineGrant => "Baby Sunshine Grant",
            GrantScheme::YoloGstGrant => "YOLO GST Grant",
        }
    }

    /// Run the scheme's qualification rule over a snapshot of households and occupants.
    pub fn evaluate(
        &self,
        households: &[Household],
        occupants: &[Occupant],
        as_of: NaiveDate,
    ) -> Vec<QualifyingHousehold> {
        match self {
            GrantScheme::StudentEncouragementBonus => {
                student_encouragement_bonus(households, occupants, as_of)
            }
            GrantScheme::MultigenerationScheme => {
                multigeneration_scheme(households, occupants, as_of)
            }
            GrantScheme::ElderBonus => elder_bonus(households, occupants, as_of),
            GrantScheme::BabySunshineGrant => baby_sunshine_grant(households, occupants, as_of),
            GrantScheme::YoloGstGrant => yolo_gst_grant(households, occupants),
        }
    }
}

impl fmt::Display for GrantScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown grant scheme '{0}'")]
pub struct UnknownGrantScheme(pub String);

impl FromStr for GrantScheme {
    type Err = UnknownGrantScheme;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        GrantScheme::ALL
            .into_iter()
            .find(|scheme| scheme.slug() == normalized)
            .ok_or_else(|| UnknownGrantScheme(value.to_string()))
    }
}

/// A household that qualifies for a scheme, with the occupants that matter for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifyingHousehold {
    pub household: Household,
    pub matched_members: Vec<Occupant>,
}

/// Under-16 students in a household earning less than 200k in total. Every under-16
/// occupant is listed, whatever their occupation.
pub fn student_encouragement_bonus(
    households: &[Household],
    occupants: &[Occupant],
    as_of: NaiveDate,
) -> Vec<QualifyingHousehold> {
    let under_sixteen = |occupant: &Occupant| {
        age_of(occupant, as_of).is_some_and(|age| age < STUDENT_AGE_LIMIT)
    };

    select(
        households,
        occupants,
        |_, members| {
            members
                .iter()
                .any(|occupant| occupant.is_student() && under_sixteen(occupant))
                && total_income(members) < STUDENT_INCOME_CEILING
        },
        under_sixteen,
    )
}

/// Households under 150k with someone younger than 18 or older than 55.
pub fn multigeneration_scheme(
    households: &[Household],
    occupants: &[Occupant],
    as_of: NaiveDate,
) -> Vec<QualifyingHousehold> {
    select(
        households,
        occupants,
        |_, members| {
            total_income(members) < MULTIGENERATION_INCOME_CEILING
                && members.iter().any(|occupant| {
                    age_of(occupant, as_of).is_some_and(|age| {
                        age < MULTIGENERATION_YOUTH_LIMIT || age > ELDER_AGE
                    })
                })
        },
        |_| true,
    )
}

/// HDB households with an occupant older than 55. Occupants aged exactly 55 are listed
/// alongside the elders but cannot qualify the household on their own.
pub fn elder_bonus(
    households: &[Household],
    occupants: &[Occupant],
    as_of: NaiveDate,
) -> Vec<QualifyingHousehold> {
    select(
        households,
        occupants,
        |household, members| {
            household.is_hdb()
                && members
                    .iter()
                    .any(|occupant| age_of(occupant, as_of).is_some_and(|age| age > ELDER_AGE))
        },
        |occupant| age_of(occupant, as_of).is_some_and(|age| age >= ELDER_AGE),
    )
}

/// Households with a baby born within the last 8 months. Births after `as_of` are outside
/// the window, so evaluating a past date never counts children born later.
pub fn baby_sunshine_grant(
    households: &[Household],
    occupants: &[Occupant],
    as_of: NaiveDate,
) -> Vec<QualifyingHousehold> {
    let cutoff = as_of
        .checked_sub_months(Months::new(BABY_WINDOW_MONTHS))
        .unwrap_or(NaiveDate::MIN);
    let is_baby = |occupant: &Occupant| occupant.dob > cutoff && occupant.dob <= as_of;

    select(
        households,
        occupants,
        |_, members| members.iter().any(is_baby),
        is_baby,
    )
}

/// HDB households earning less than 100k in total.
pub fn yolo_gst_grant(households: &[Household], occupants: &[Occupant]) -> Vec<QualifyingHousehold> {
    select(
        households,
        occupants,
        |household, members| household.is_hdb() && total_income(members) < YOLO_INCOME_CEILING,
        |_| true,
    )
}

/// Shared driver: walks each occupied household once (ordered by id), applies the
/// qualification predicate to its full member list, then keeps the matching members.
fn select<Q, M>(
    households: &[Household],
    occupants: &[Occupant],
    qualifies: Q,
    matches: M,
) -> Vec<QualifyingHousehold>
where
    Q: Fn(&Household, &[Occupant]) -> bool,
    M: Fn(&Occupant) -> bool,
{
    let groups = group_by_household(occupants);
    let households: BTreeMap<HouseholdId, &Household> = households
        .iter()
        .map(|household| (household.household_id, household))
        .collect();

    households
        .into_iter()
        .filter_map(|(id, household)| {
            let members = groups.get(&id)?;
            if members.is_empty() || !qualifies(household, members.as_slice()) {
                return None;
            }

            Some(QualifyingHousehold {
                household: household.clone(),
                matched_members: members
                    .iter()
                    .filter(|&occupant| matches(occupant))
                    .cloned()
                    .collect(),
            })
        })
        .collect()
}

fn age_of(occupant: &Occupant, as_of: NaiveDate) -> Option<u32> {
    match age_in_years(occupant.dob, as_of) {
        Ok(age) => Some(age),
        Err(err) => {
            warn!(uuid = %occupant.uuid, %err, "occupant excluded from age-based criteria");
            None
        }
    }
}
