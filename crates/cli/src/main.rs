use std::process::ExitCode;

fn main() -> ExitCode {
    haggle_cli::run()
}
