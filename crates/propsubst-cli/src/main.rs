use std::process::ExitCode;

fn main() -> ExitCode {
    propsubst_cli::run()
}
