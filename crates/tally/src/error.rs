use tally_core::schema::Rejection;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("No result: {0}")]
    NoResult(#[from] tally_core::PipelineError),

    #[error("Input from {0} is empty")]
    EmptyInput(String),
}

/// Log every dropped row and, in verbose mode, print how many were skipped
pub fn report_rejections(row_kind: &str, rejected: &[Rejection], verbose: bool) {
    use colored::Colorize;

    for rejection in rejected {
        log::debug!(
            "skipped {} #{}: {}",
            row_kind,
            rejection.index,
            rejection.reason
        );
    }

    if verbose && !rejected.is_empty() {
        anstream::eprintln!(
            "{} skipped {} invalid {}(s)",
            "warning:".yellow().bold(),
            rejected.len(),
            row_kind
        );
    }
}
