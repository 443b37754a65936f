// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::Path;
use std::process::{Command, ExitCode};

const COMMANDS: [(&str, &str); 5] = [
    ("fmt", "cargo fmt --all -- --check"),
    ("lint", "cargo clippy --workspace --all-targets -- -D warnings"),
    ("test", "cargo test --workspace"),
    ("bench", "cargo bench -p bijux-inspector-query --bench profile_schema"),
    (
        "perf-smoke",
        "cargo test -p bijux-inspector-runtime --test pipeline_end_to_end perf_report",
    ),
];

fn run(root: &Path, cmd: &str) -> Result<(), String> {
    let status = Command::new("sh")
        .arg("-lc")
        .arg(cmd)
        .current_dir(root)
        .status()
        .map_err(|e| format!("failed to run `{cmd}`: {e}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("command failed: {cmd}"))
    }
}

fn main() -> ExitCode {
    let arg = env::args().nth(1).unwrap_or_else(|| "help".to_string());
    let Some(root) = Path::new(env!("CARGO_MANIFEST_DIR")).parent() else {
        eprintln!("xtask must live one level below the workspace root");
        return ExitCode::FAILURE;
    };

    let result = match arg.as_str() {
        "ci" => COMMANDS[..3]
            .iter()
            .try_for_each(|(_, cmd)| run(root, cmd)),
        "help" | "--help" | "-h" => {
            eprintln!("xtask commands:");
            eprintln!("  ci");
            for (name, _) in COMMANDS {
                eprintln!("  {name}");
            }
            Ok(())
        }
        other => match COMMANDS.iter().find(|(name, _)| *name == other) {
            Some((_, cmd)) => run(root, cmd),
            None => Err(format!(
                "unknown xtask command: {other} (try `cargo run --manifest-path xtask/Cargo.toml -- help`)"
            )),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
