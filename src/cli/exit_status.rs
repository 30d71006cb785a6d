use std::process::ExitCode;

/// Exit status for the CLI, following common conventions for batch tools.
///
/// - `Success` (0): all units processed.
/// - `Failure` (1): run completed but some units were skipped (read or
///   parse failures).
/// - `Error` (2): the run aborted (I/O failure, console failure, bad
///   arguments).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
