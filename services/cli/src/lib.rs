mod cli;
mod infra;
mod render;

use triage_points::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
