// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

fn collect_rs_files(root: &Path, out: &mut Vec<PathBuf>) {
    if let Ok(entries) = fs::read_dir(root) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                collect_rs_files(&path, out);
            } else if path.extension().and_then(|x| x.to_str()) == Some("rs") {
                out.push(path);
            }
        }
    }
}

#[test]
fn runtime_cargo_keeps_the_pure_crates_below_it() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cargo_toml = fs::read_to_string(root.join("Cargo.toml")).expect("read Cargo.toml");
    for required in ["bijux-inspector-model", "bijux-inspector-query", "tokio"] {
        assert!(
            cargo_toml.contains(required),
            "runtime crate must depend on {required}"
        );
    }
    for forbidden in ["axum", "reqwest", "rusqlite", "hyper"] {
        assert!(
            !cargo_toml.contains(forbidden),
            "forbidden dependency in runtime crate: {forbidden}"
        );
    }
}

#[test]
fn runtime_source_never_blocks_the_executor() {
    let mut files = Vec::new();
    collect_rs_files(&PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src"), &mut files);
    assert!(!files.is_empty());
    for path in files {
        let text = fs::read_to_string(&path).expect("read runtime source file");
        for forbidden in ["std::thread::sleep", "block_on(", "std::fs::read"] {
            assert!(
                !text.contains(forbidden),
                "blocking call `{forbidden}` in runtime source: {}",
                path.display()
            );
        }
    }
}

#[test]
fn only_the_engine_touches_csv_parsing() {
    let mut files = Vec::new();
    collect_rs_files(&PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/inspector"), &mut files);
    for path in files {
        let text = fs::read_to_string(&path).expect("read inspector source file");
        assert!(
            !text.contains("csv::"),
            "inspector module parses CSV directly: {}",
            path.display()
        );
    }
}
