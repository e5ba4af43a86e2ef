//! Shared JSON fixtures for integration tests across the workspace.
//!
//! Fixtures live under the repository-level `fixtures/` directory and are
//! named in `fixtures/manifest.json`, grouped by kind.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    skeletons: HashMap<String, String>,
    animations: HashMap<String, String>,
    documents: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

macro_rules! fixture_kind {
    ($module:ident, $field:ident, $label:literal) => {
        pub mod $module {
            use super::*;

            pub fn keys() -> Vec<String> {
                let mut keys: Vec<String> = MANIFEST.$field.keys().cloned().collect();
                keys.sort();
                keys
            }

            pub fn json(name: &str) -> Result<String> {
                read_to_string(lookup(&MANIFEST.$field, $label, name)?)
            }

            pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
                load_json(lookup(&MANIFEST.$field, $label, name)?)
            }

            pub fn path(name: &str) -> Result<PathBuf> {
                Ok(resolve_path(lookup(&MANIFEST.$field, $label, name)?))
            }
        }
    };
}

fixture_kind!(skeletons, skeletons, "skeleton");
fixture_kind!(animations, animations, "animation");
fixture_kind!(documents, documents, "document");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_entries_resolve() {
        for name in skeletons::keys() {
            assert!(skeletons::path(&name).unwrap().exists(), "{name}");
        }
        for name in animations::keys() {
            assert!(animations::path(&name).unwrap().exists(), "{name}");
        }
        for name in documents::keys() {
            assert!(documents::path(&name).unwrap().exists(), "{name}");
        }
        assert!(skeletons::json("missing").is_err());
    }
}
