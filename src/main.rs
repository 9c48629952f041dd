use std::process::ExitCode;

fn main() -> ExitCode {
    match twofold::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            twofold::ui::output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
