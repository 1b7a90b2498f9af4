//! Shared helpers for driving the `comic-enrich` binary.

use std::path::Path;
use std::process::{Command, Output};

/// Run `comic-enrich` in `cwd` with Marvel keys and log filters scrubbed from
/// the environment, so no test can reach the network.
pub fn run_offline(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_comic-enrich"))
        .args(args)
        .current_dir(cwd)
        .env_remove("MARVEL_PUBLIC_KEY")
        .env_remove("MARVEL_PRIVATE_KEY")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("spawn comic-enrich")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
