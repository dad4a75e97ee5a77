// Copyright (C) 2020 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

/// Update package document as sent by the server.
///
/// Objects are kept as raw documents; their concrete shape depends on
/// the install mode and is resolved only when they are going to be
/// installed.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UpdatePackage {
    #[serde(rename = "product")]
    pub product_uid: String,
    pub version: String,
    #[serde(default, rename = "supported-hardware")]
    pub supported_hardware: SupportedHardware,
    pub objects: Vec<serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(untagged)]
pub enum SupportedHardware {
    #[default]
    #[serde(deserialize_with = "any")]
    Any,
    HardwareList(Vec<String>),
}

impl SupportedHardware {
    pub fn is_compatible_with(&self, hardware: &str) -> bool {
        match self {
            SupportedHardware::Any => true,
            SupportedHardware::HardwareList(l) => l.iter().any(|h| h == hardware),
        }
    }
}

fn any<'de, D: serde::de::Deserializer<'de>>(deserializer: D) -> Result<(), D::Error> {
    if String::deserialize(deserializer)? == "any" {
        Ok(())
    } else {
        Err(serde::de::Error::custom("expected \"any\""))
    }
}
