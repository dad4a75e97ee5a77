// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Deserializer};

/// How many `ChunkSize` blocks must be copied from the source file to
/// the target. Any negative value, -1 being the default, means all
/// possible bytes until the end of the file.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Count {
    #[default]
    All,
    Limited(u64),
}

impl Count {
    /// Upper bound of bytes covered by this count, if any.
    pub fn bytes(self, chunk_size: usize) -> Option<u64> {
        match self {
            Count::All => None,
            Count::Limited(n) => Some(n.saturating_mul(chunk_size as u64)),
        }
    }

    /// Whether `chunks` blocks already fulfill this count.
    pub fn is_reached(self, chunks: u64) -> bool {
        match self {
            Count::All => false,
            Count::Limited(n) => chunks >= n,
        }
    }
}

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = i64::deserialize(deserializer)?;
        if n < 0 {
            return Ok(Count::All);
        }

        Ok(Count::Limited(n as u64))
    }
}
