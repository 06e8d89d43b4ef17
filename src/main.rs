use std::process::ExitCode;

use color_eyre::eyre::Result;
use webgl_check::RunStatus;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    Ok(match webgl_check::run()? {
        RunStatus::Passed => ExitCode::SUCCESS,
        RunStatus::Failed { .. } => ExitCode::FAILURE,
    })
}
