use std::process::ExitCode;

use file_organizer::OrganizerError;
use file_organizer::output as out;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = file_organizer::cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = match e.downcast_ref::<OrganizerError>() {
                Some(oe) => oe.code(),
                None => 1,
            };
            // NotFound was already reported by the engine; everything else is printed here.
            if !matches!(
                e.downcast_ref::<OrganizerError>(),
                Some(OrganizerError::NotFound(_) | OrganizerError::NotADirectory(_))
            ) {
                out::print_error(&format!("{e:#}"));
            }
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
