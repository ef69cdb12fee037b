use std::process::ExitCode;

pub mod dispatch;
pub mod index;
pub mod intent;
pub mod schema;
pub mod status;
pub mod validate;

/// Exit status for a query or document the pipeline turned away.
pub const EXIT_REJECTED: u8 = 2;

#[must_use]
pub fn rejected() -> ExitCode {
    ExitCode::from(EXIT_REJECTED)
}
