use std::collections::BTreeMap;

use super::domain::{HouseholdId, Occupant};

/// Sum of declared annual income. Occupants without a declared income add nothing, so an
/// empty or all-undeclared set totals 0. The sum saturates at `i64::MAX` instead of
/// wrapping, so an oversized total stays above every income ceiling.
pub fn total_income(occupants: &[Occupant]) -> i64 {
    occupants
        .iter()
        .filter_map(|occupant| occupant.annual_income)
        .fold(0_i64, i64::saturating_add)
}

/// Group occupants by household. Members within a group are ordered by `uuid`.
pub fn group_by_household(occupants: &[Occupant]) -> BTreeMap<HouseholdId, Vec<Occupant>> {
    let mut groups: BTreeMap<HouseholdId, Vec<Occupant>> = BTreeMap::new();
    for occupant in occupants {
        groups
            .entry(occupant.household_id)
            .or_default()
            .push(occupant.clone());
    }

    for members in groups.values_mut() {
        members.sort_by_key(|occupant| occupant.uuid);
    }

    groups
}
