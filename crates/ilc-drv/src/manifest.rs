//! The manifest the core writes alongside generated classes before
//! handing everything to the archiver, per spec.md §6's archive
//! collaborator contract.

use serde::Serialize;

#[derive(Serialize)]
pub struct Manifest {
    #[serde(rename = "manifest-version")]
    pub manifest_version: &'static str,
    #[serde(rename = "main-class")]
    pub main_class: String,
    pub producer: &'static str,
}

impl Manifest {
    pub fn new(main_class: impl Into<String>) -> Self {
        Self {
            manifest_version: "1.0",
            main_class: main_class.into(),
            producer: "ilc",
        }
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
