// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use serde::{de, Deserialize, Deserializer};

/// Properties shared by every install mode object.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ObjectMetadata {
    pub mode: String,
    #[serde(deserialize_with = "sha256sum")]
    pub sha256sum: String,
    pub size: u64,
    #[serde(default)]
    pub compressed: bool,
    /// Kept as given; the rule is interpreted by each install mode, if
    /// at all.
    #[serde(default)]
    pub install_if_different: Option<serde_json::Value>,
}

fn sha256sum<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.len() != 64 || !s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')) {
        return Err(de::Error::custom(format!("invalid sha256sum: {:?}", s)));
    }

    Ok(s)
}
