// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

/// True if the target should be cut to the end of the written data
/// once the copy finishes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
pub struct Truncate(pub bool);

impl Default for Truncate {
    fn default() -> Self {
        Truncate(true)
    }
}
