// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::Installer;
use derive_more::{Display, Error, From};
use pkg_schema::objects;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use slog_scope::{debug, trace};
use std::collections::BTreeMap;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, From)]
pub enum Error {
    #[display(fmt = "object does not declare its mode")]
    MissingMode,
    #[display(fmt = "unknown install mode '{}'", _0)]
    #[from(ignore)]
    UnknownMode(#[error(not(source))] String),
    #[display(fmt = "compressed object does not embed required compression fields")]
    MissingCompressionFields,
    #[display(fmt = "invalid object document: {}", _0)]
    Json(serde_json::Error),
}

/// Builds an install object out of its full metadata document.
pub(crate) type Constructor = fn(Value) -> serde_json::Result<Box<dyn Installer>>;

struct Variant {
    constructor: Constructor,
    supports_compression: bool,
}

/// Mapping from install mode to the object variant handling it.
///
/// It is filled once at startup and only read afterwards.
pub(crate) struct Registry {
    variants: BTreeMap<&'static str, Variant>,
}

pub(crate) fn construct<T>(document: Value) -> serde_json::Result<Box<dyn Installer>>
where
    T: Installer + DeserializeOwned + 'static,
{
    Ok(Box::new(serde_json::from_value::<T>(document)?))
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Registry::empty();
        registry.register("copy", true, construct::<objects::Copy>);
        registry.register("raw", true, construct::<objects::Raw>);
        registry.register("tarball", true, construct::<objects::Tarball>);
        registry.register("test", false, construct::<objects::Test>);
        registry
    }
}

impl Registry {
    pub(crate) fn empty() -> Self {
        Registry { variants: BTreeMap::default() }
    }

    /// Registers `mode`. Variants which do not embed the compression
    /// size fields must not claim compression support.
    pub(crate) fn register(
        &mut self,
        mode: &'static str,
        supports_compression: bool,
        constructor: Constructor,
    ) {
        trace!("registering '{}' install mode", mode);
        self.variants.insert(mode, Variant { constructor, supports_compression });
    }

    /// Drops every variant whose mode is not listed in `modes`.
    pub(crate) fn retain_modes(&mut self, modes: &[String]) {
        self.variants.retain(|mode, _| modes.iter().any(|m| m == mode));
    }

    pub(crate) fn is_registered(&self, mode: &str) -> bool {
        self.variants.contains_key(mode)
    }

    pub(crate) fn decode(&self, content: &[u8]) -> Result<Box<dyn Installer>> {
        self.decode_map(serde_json::from_slice(content)?)
    }

    pub(crate) fn decode_value(&self, document: Value) -> Result<Box<dyn Installer>> {
        self.decode_map(serde_json::from_value(document)?)
    }

    fn decode_map(&self, document: Map<String, Value>) -> Result<Box<dyn Installer>> {
        let mode = document.get("mode").and_then(Value::as_str).ok_or(Error::MissingMode)?;
        let variant =
            self.variants.get(mode).ok_or_else(|| Error::UnknownMode(mode.to_string()))?;

        let compressed = document.get("compressed").and_then(Value::as_bool).unwrap_or(false);
        if compressed && !variant.supports_compression {
            return Err(Error::MissingCompressionFields);
        }

        debug!("decoding '{}' object", mode);
        Ok((variant.constructor)(Value::Object(document))?)
    }
}
