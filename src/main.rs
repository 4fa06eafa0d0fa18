use std::process::ExitCode;

fn main() -> ExitCode {
    brace::cli::run()
}
