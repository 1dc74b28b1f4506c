use std::process::ExitCode;

fn main() -> ExitCode {
    leadportal_cli::run()
}
