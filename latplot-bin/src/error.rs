use latplot_chart::RenderError;
use latplot_report::ReportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("No input file given. Usage: latplot <INPUT> [OUTPUT]")]
    MissingArgument,
    #[error("Could not load config: {0:#}")]
    Config(anyhow::Error),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl CliError {
    /// Every failure exits with status 1.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
