// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

/// Size requirements carried by objects able to hold a compressed
/// payload.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct CompressedSizes {
    #[serde(default)]
    pub required_compressed_size: u64,
    #[serde(default)]
    pub required_uncompressed_size: u64,
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn deserialize() {
        assert_eq!(
            serde_json::from_value::<CompressedSizes>(json!({
                "required-uncompressed-size": 2048,
            }))
            .unwrap(),
            CompressedSizes { required_compressed_size: 0, required_uncompressed_size: 2048 }
        );
    }
}
