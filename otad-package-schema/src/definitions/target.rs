// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;
use std::path::PathBuf;

/// The device that will receive the update.
///
/// The `target_type` is kept verbatim so each install mode can
/// report which kinds of target it accepts.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Target {
    pub target_type: String,
    pub target: PathBuf,
}

impl Target {
    pub const DEVICE: &'static str = "device";

    pub fn is_device(&self) -> bool {
        self.target_type == Self::DEVICE
    }
}
