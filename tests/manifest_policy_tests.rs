#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
//! Manifest policy tests for the Connect Four client.
//!
//! These tests parse Cargo.toml and verify that lints, features, and demo
//! targets conform to project policy. If any test fails, the manifest has
//! drifted from the agreed-upon standards.
//!
//! All checks are synchronous filesystem reads; no network access or async
//! runtime needed.

use std::path::PathBuf;

/// Returns the project root directory (where Cargo.toml lives).
fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Parses Cargo.toml into a TOML table.
fn manifest() -> toml::Table {
    let path = project_root().join("Cargo.toml");
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read '{}': {e}", path.display()));
    text.parse::<toml::Table>()
        .unwrap_or_else(|e| panic!("Cargo.toml is not valid TOML: {e}"))
}

/// Lints that library code must never trip.
const DENIED_CLIPPY_LINTS: &[&str] = &[
    "unwrap_used",
    "expect_used",
    "panic",
    "todo",
    "unimplemented",
    "indexing_slicing",
];

mod lints {
    use super::*;

    #[test]
    fn panicking_lints_are_denied() {
        let manifest = manifest();
        let clippy = manifest["lints"]["clippy"]
            .as_table()
            .expect("Cargo.toml must have a [lints.clippy] table");

        for lint in DENIED_CLIPPY_LINTS {
            let level = clippy
                .get(*lint)
                .and_then(toml::Value::as_str)
                .unwrap_or_else(|| panic!("clippy lint '{lint}' is not configured"));
            assert_eq!(
                level, "deny",
                "clippy lint '{lint}' must be 'deny', found '{level}'. \
                 Library code propagates errors instead of panicking."
            );
        }
    }

    #[test]
    fn msrv_is_declared() {
        let manifest = manifest();
        let msrv = manifest["package"]["rust-version"]
            .as_str()
            .expect("Cargo.toml must declare a rust-version");
        let parts: Vec<&str> = msrv.split('.').collect();
        assert_eq!(parts.len(), 3, "rust-version '{msrv}' must be MAJOR.MINOR.PATCH");
        assert!(parts.iter().all(|p| p.parse::<u32>().is_ok()));
    }
}

mod features {
    use super::*;

    #[test]
    fn http_transport_is_default() {
        let manifest = manifest();
        let default = manifest["features"]["default"]
            .as_array()
            .expect("default feature list");
        assert!(
            default.iter().any(|f| f.as_str() == Some("transport-http")),
            "the HTTP transport must be enabled by default"
        );
    }

    #[test]
    fn http_client_is_optional() {
        let manifest = manifest();
        let reqwest = &manifest["dependencies"]["reqwest"];
        assert_eq!(
            reqwest.get("optional").and_then(toml::Value::as_bool),
            Some(true),
            "reqwest must stay optional so custom transports can drop it"
        );

        let feature = manifest["features"]["transport-http"]
            .as_array()
            .expect("transport-http feature list");
        assert!(feature.iter().any(|f| f.as_str() == Some("dep:reqwest")));
    }

    #[test]
    fn tests_can_pause_time() {
        let manifest = manifest();
        let features = manifest["dev-dependencies"]["tokio"]["features"]
            .as_array()
            .expect("dev tokio features");
        assert!(
            features.iter().any(|f| f.as_str() == Some("test-util")),
            "timer tests run on a paused clock and need tokio's test-util"
        );
    }
}

mod demos {
    use super::*;

    #[test]
    fn every_demo_target_exists() {
        let manifest = manifest();
        let targets = manifest["example"].as_array().expect("[[example]] targets");
        assert!(!targets.is_empty());

        for target in targets {
            let name = target["name"].as_str().expect("example name");
            let path = target["path"].as_str().expect("example path");
            assert!(
                project_root().join(path).is_file(),
                "example '{name}' points at missing file '{path}'"
            );
        }
    }

    #[test]
    fn http_demo_requires_http_feature() {
        let manifest = manifest();
        let targets = manifest["example"].as_array().unwrap();
        let terminal = targets
            .iter()
            .find(|t| t["name"].as_str() == Some("terminal_play"))
            .expect("terminal_play example");
        let required = terminal["required-features"].as_array().unwrap();
        assert!(required.iter().any(|f| f.as_str() == Some("transport-http")));
    }
}
