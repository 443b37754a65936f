// SPDX-License-Identifier: Apache-2.0

#[test]
fn query_crate_cargo_has_no_async_or_runtime_dependency() {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cargo_toml = std::fs::read_to_string(root.join("Cargo.toml")).expect("read Cargo.toml");
    for forbidden in ["tokio", "async-trait", "bijux-inspector-runtime", "csv"] {
        assert!(
            !cargo_toml.contains(forbidden),
            "forbidden dependency in query crate: {forbidden}"
        );
    }
}

#[test]
fn query_sources_are_free_of_io_and_clocks() {
    let src = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src");
    for entry in std::fs::read_dir(src).expect("read src") {
        let path = entry.expect("dir entry").path();
        let text = std::fs::read_to_string(&path).expect("read source");
        for forbidden in ["std::fs", "Instant::now", "SystemTime", "tokio"] {
            assert!(
                !text.contains(forbidden),
                "forbidden token `{forbidden}` in {}",
                path.display()
            );
        }
    }
}
