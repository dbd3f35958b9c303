//! End-to-end scenarios for household registration and grant queries through the public
//! service facade and HTTP router.

mod common {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;

    use grant_disbursement::grants::{
        GrantService, Household, HouseholdId, HouseholdRepository, NewHousehold, NewOccupant,
        Occupant, OccupantId, RepositoryError,
    };

    #[derive(Default)]
    pub(super) struct MemoryRepository {
        households: Mutex<BTreeMap<HouseholdId, Household>>,
        occupants: Mutex<BTreeMap<OccupantId, Occupant>>,
    }

    impl HouseholdRepository for MemoryRepository {
        fn create_household(
            &self,
            household: NewHousehold,
        ) -> Result<HouseholdId, RepositoryError> {
            let mut households = self.households.lock().expect("households mutex poisoned");
            let id = HouseholdId(households.len() as u64 + 1);
            households.insert(
                id,
                Household {
                    household_id: id,
                    housing_type: household.housing_type,
                },
            );
            Ok(id)
        }

        fn create_occupant(&self, occupant: NewOccupant) -> Result<OccupantId, RepositoryError> {
            let households = self.households.lock().expect("households mutex poisoned");
            if !households.contains_key(&occupant.household_id) {
                return Err(RepositoryError::ConstraintViolation(
                    "unknown household".to_string(),
                ));
            }
            let mut occupants = self.occupants.lock().expect("occupants mutex poisoned");
            let uuid = OccupantId(occupants.len() as u64 + 1);
            occupants.insert(uuid, occupant.into_occupant(uuid));
            Ok(uuid)
        }

        fn households(&self) -> Result<Vec<Household>, RepositoryError> {
            let households = self.households.lock().expect("households mutex poisoned");
            Ok(households.values().cloned().collect())
        }

        fn household(&self, id: HouseholdId) -> Result<Option<Household>, RepositoryError> {
            let households = self.households.lock().expect("households mutex poisoned");
            Ok(households.get(&id).cloned())
        }

        fn occupants(&self) -> Result<Vec<Occupant>, RepositoryError> {
            let occupants = self.occupants.lock().expect("occupants mutex poisoned");
            Ok(occupants.values().cloned().collect())
        }

        fn occupants_of(&self, id: HouseholdId) -> Result<Vec<Occupant>, RepositoryError> {
            let occupants = self.occupants.lock().expect("occupants mutex poisoned");
            Ok(occupants
                .values()
                .filter(|occupant| occupant.household_id == id)
                .cloned()
                .collect())
        }
    }

    pub(super) fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 14).expect("valid date")
    }

    pub(super) fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
    }

    pub(super) fn member(
        household_id: HouseholdId,
        name: &str,
        occupation_type: &str,
        annual_income: Option<i64>,
        dob: &str,
    ) -> NewOccupant {
        NewOccupant {
            household_id,
            name: name.to_string(),
            gender: "Female".to_string(),
            marital_status: "Single".to_string(),
            spouse: None,
            occupation_type: occupation_type.to_string(),
            annual_income,
            dob: date(dob),
        }
    }

    /// Three households covering every scheme:
    /// 1. HDB family of four with a newborn and a grandparent, 90k total.
    /// 2. Condominium couple with a 10-year-old student, 180k total.
    /// 3. Landed single earner, 300k.
    pub(super) fn seeded_service() -> GrantService<MemoryRepository> {
        let service = GrantService::new(Arc::new(MemoryRepository::default()));

        let hdb = service
            .create_household(NewHousehold {
                housing_type: "HDB".to_string(),
            })
            .expect("household created");
        for new_member in [
            member(hdb, "Aisyah", "Employed", Some(60_000), "1988-02-10"),
            member(hdb, "Farid", "Employed", Some(30_000), "1987-09-30"),
            member(hdb, "Nur", "Unemployed", None, "2024-01-05"),
            member(hdb, "Hajah Mariam", "Unemployed", None, "1960-05-01"),
        ] {
            service.add_member(new_member).expect("member added");
        }

        let condo = service
            .create_household(NewHousehold {
                housing_type: "Condominium".to_string(),
            })
            .expect("household created");
        for new_member in [
            member(condo, "Wei Ling", "Employed", Some(100_000), "1982-07-19"),
            member(condo, "Jun Hao", "Employed", Some(80_000), "1981-03-03"),
            member(condo, "Xin Yi", "Student", None, "2013-11-11"),
        ] {
            service.add_member(new_member).expect("member added");
        }

        let landed = service
            .create_household(NewHousehold {
                housing_type: "Landed".to_string(),
            })
            .expect("household created");
        service
            .add_member(member(landed, "Arjun", "Employed", Some(300_000), "1970-12-24"))
            .expect("member added");

        service
    }
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use grant_disbursement::grants::{grant_router, GrantScheme, HouseholdId, HouseholdView};
use tower::ServiceExt;

use common::{as_of, seeded_service};

fn household_ids(views: &[HouseholdView]) -> Vec<u64> {
    views.iter().map(|view| view.household_id.0).collect()
}

fn evaluate(scheme: GrantScheme) -> Vec<HouseholdView> {
    seeded_service()
        .grant(scheme, as_of())
        .expect("grant evaluates")
        .into_iter()
        .map(HouseholdView::from)
        .collect()
}

#[test]
fn student_bonus_picks_the_condominium_family() {
    let result = evaluate(GrantScheme::StudentEncouragementBonus);
    assert_eq!(household_ids(&result), vec![2]);
    let names: Vec<&str> = result[0].members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Xin Yi"]);
}

#[test]
fn multigeneration_scheme_lists_every_member() {
    let result = evaluate(GrantScheme::MultigenerationScheme);
    assert_eq!(household_ids(&result), vec![1]);
    assert_eq!(result[0].members.len(), 4);
}

#[test]
fn elder_bonus_lists_only_the_grandparent() {
    let result = evaluate(GrantScheme::ElderBonus);
    assert_eq!(household_ids(&result), vec![1]);
    assert_eq!(result[0].members.len(), 1);
    assert_eq!(result[0].members[0].name, "Hajah Mariam");
}

#[test]
fn baby_sunshine_grant_lists_the_newborn() {
    let result = evaluate(GrantScheme::BabySunshineGrant);
    assert_eq!(household_ids(&result), vec![1]);
    assert_eq!(result[0].members[0].name, "Nur");
}

#[test]
fn yolo_gst_grant_needs_hdb_and_low_income() {
    let result = evaluate(GrantScheme::YoloGstGrant);
    assert_eq!(household_ids(&result), vec![1]);
    assert_eq!(result[0].household_id, HouseholdId(1));
}

#[tokio::test]
async fn http_surface_serves_every_scheme() {
    let router = grant_router(Arc::new(seeded_service()));

    for scheme in GrantScheme::ALL {
        let uri = format!("/grant/{}?as_of=2024-06-14", scheme.slug());
        let response = router
            .clone()
            .oneshot(Request::get(uri.as_str()).body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK, "{scheme}");
    }

    let response = router
        .oneshot(
            Request::get("/household/list-households")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let listing: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(listing.as_array().map(Vec::len), Some(3));
    assert_eq!(listing[2]["members"][0]["annual_income"], 300_000);
}
