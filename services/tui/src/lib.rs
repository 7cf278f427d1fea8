mod app;
mod cli;
mod demo;
mod runner;
mod ui;

use careers_intake::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
