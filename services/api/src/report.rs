use crate::infra::{parse_date, InMemoryHouseholdRepository};
use chrono::{Local, NaiveDate};
use clap::Args;
use grant_disbursement::error::AppError;
use grant_disbursement::grants::{GrantScheme, GrantService, HouseholdView, SnapshotImporter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct GrantReportArgs {
    /// Grant scheme slug, e.g. elder-bonus or yolo-gst-grant
    pub(crate) scheme: GrantScheme,
    /// CSV export with household_id,housing_type columns
    #[arg(long)]
    pub(crate) households: PathBuf,
    /// CSV export with one row per occupant
    #[arg(long)]
    pub(crate) occupants: PathBuf,
    /// Reference date for ages (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print the API JSON payload instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_grant_report(args: GrantReportArgs) -> Result<(), AppError> {
    let GrantReportArgs {
        scheme,
        households,
        occupants,
        as_of,
        json,
    } = args;

    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let views = evaluate_exports(scheme, &households, &occupants, as_of)?;

    if json {
        match serde_json::to_string_pretty(&views) {
            Ok(payload) => println!("{payload}"),
            Err(err) => return Err(AppError::Io(err.into())),
        }
        return Ok(());
    }

    render_grant_report(scheme, as_of, &views);
    Ok(())
}

fn evaluate_exports(
    scheme: GrantScheme,
    households: &Path,
    occupants: &Path,
    as_of: NaiveDate,
) -> Result<Vec<HouseholdView>, AppError> {
    let snapshot = SnapshotImporter::from_paths(households, occupants)?;
    let service = GrantService::new(Arc::new(InMemoryHouseholdRepository::default()));
    service.seed(snapshot)?;

    Ok(service
        .grant(scheme, as_of)?
        .into_iter()
        .map(HouseholdView::from)
        .collect())
}

fn render_grant_report(scheme: GrantScheme, as_of: NaiveDate, views: &[HouseholdView]) {
    println!("{} as of {}", scheme.label(), as_of);
    if views.is_empty() {
        println!("No households qualify.");
        return;
    }

    println!("{} qualifying household(s)", views.len());
    for view in views {
        println!(
            "- Household {} ({}) | {} member(s)",
            view.household_id,
            view.housing_type,
            view.members.len()
        );
        for member in &view.members {
            let income = member
                .annual_income
                .map(|income| income.to_string())
                .unwrap_or_else(|| "n/a".to_string());
            println!(
                "  - #{} {} | born {} | {} | income {}",
                member.uuid, member.name, member.dob, member.occupation_type, income
            );
        }
    }
}
