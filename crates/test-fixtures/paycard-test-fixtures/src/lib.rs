use std::collections::{BTreeMap, HashMap};
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
    cards: HashMap<String, String>,
    forms: HashMap<String, String>,
}

/// One sample card number with the network it must be detected as.
#[derive(Clone, Debug, Deserialize)]
pub struct CardSample {
    pub number: String,
    pub network: String,
    #[serde(default)]
    pub formatted: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Input values per logical field name (`number`, `expiry`, `cvc`, `name`).
/// A field with several entries is rendered as several inputs sharing the name.
pub type FormValues = BTreeMap<String, Vec<String>>;

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

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a String> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod cards {
    use super::*;

    pub fn samples(name: &str) -> Result<Vec<CardSample>> {
        let rel = lookup(&MANIFEST.cards, "card", name)?;
        super::load_json(rel)
    }
}

pub mod forms {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.forms.keys().cloned().collect()
    }

    pub fn values(name: &str) -> Result<FormValues> {
        let rel = lookup(&MANIFEST.forms, "form", name)?;
        super::load_json(rel)
    }
}
