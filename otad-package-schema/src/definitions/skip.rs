// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

/// How many chunk-size blocks must be skipped in the source file
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
pub struct Skip(pub u64);
