use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    nmclient_cli::run()
}
