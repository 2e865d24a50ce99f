mod cli;
mod demo;
mod infra;

use clearance::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
