// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use serde::{de, Deserialize, Deserializer};

/// Largest buffer an object may ask for.
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// The size of the buffers (in bytes) used to read and write,
/// default is the 128KiB. Must be within `1..=MAX_CHUNK_SIZE`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ChunkSize(pub usize);

impl Default for ChunkSize {
    fn default() -> Self {
        ChunkSize(131_072)
    }
}

impl<'de> Deserialize<'de> for ChunkSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = usize::deserialize(deserializer)?;
        if n > 0 && n <= MAX_CHUNK_SIZE {
            return Ok(ChunkSize(n));
        }
        Err(de::Error::custom(format!(
            "Invalid chunk size: {}, it must be between 1 and {}",
            n, MAX_CHUNK_SIZE
        )))
    }
}
