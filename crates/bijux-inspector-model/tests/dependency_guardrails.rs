// SPDX-License-Identifier: Apache-2.0

#[test]
fn model_crate_does_not_depend_on_pipeline_crates() {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cargo_toml = std::fs::read_to_string(root.join("Cargo.toml")).expect("read Cargo.toml");
    for forbidden in [
        "bijux-inspector-query",
        "bijux-inspector-runtime",
        "tokio",
        "regex",
    ] {
        assert!(
            !cargo_toml.contains(forbidden),
            "forbidden dependency in model crate: {forbidden}"
        );
    }
}
