// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::PathBuf;

#[test]
fn core_crate_has_no_runtime_io_or_async_deps() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let text = fs::read_to_string(manifest_dir.join("Cargo.toml")).expect("read Cargo.toml");

    for forbidden in ["tokio", "async-trait", "tracing", "csv", "clap"] {
        assert!(
            !text.contains(forbidden),
            "forbidden dependency/token in core Cargo.toml: {forbidden}"
        );
    }
}

#[test]
fn core_sources_do_not_touch_the_filesystem() {
    let src = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src");
    for entry in fs::read_dir(src).expect("read src") {
        let path = entry.expect("dir entry").path();
        let text = fs::read_to_string(&path).expect("read source");
        assert!(
            !text.contains("std::fs"),
            "core source must stay pure: {}",
            path.display()
        );
    }
}
