mod cli;
mod infra;
mod report;
mod routes;
mod server;

use grant_disbursement::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
