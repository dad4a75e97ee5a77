// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use crate::{
    definitions::{ChunkSize, CompressedSizes, Count, Skip, Target, Truncate},
    ObjectMetadata,
};
use serde::Deserialize;

#[derive(Clone, Deserialize, PartialEq, Debug)]
#[serde(rename_all = "kebab-case")]
pub struct Raw {
    #[serde(flatten)]
    pub metadata: ObjectMetadata,
    #[serde(flatten)]
    pub target: Target,
    #[serde(flatten)]
    pub compression: CompressedSizes,

    #[serde(default)]
    pub chunk_size: ChunkSize,
    #[serde(default)]
    pub skip: Skip,
    /// Offset, in bytes, where writing starts on the target.
    #[serde(default)]
    pub seek: u64,
    #[serde(default)]
    pub count: Count,
    #[serde(default)]
    pub truncate: Truncate,
}

#[test]
fn deserialize() {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::PathBuf;

    assert_eq!(
        Raw {
            metadata: ObjectMetadata {
                mode: "raw".to_string(),
                sha256sum: "cfe2be1c64b0387500853de0f48303e3de7b1c6f1508dc719eeafa0d41c36722"
                    .to_string(),
                size: 1024,
                compressed: true,
                install_if_different: Some(json!("sha256sum")),
            },
            target: Target { target_type: "device".to_string(), target: PathBuf::from("/dev/sdb") },
            compression: CompressedSizes {
                required_compressed_size: 1024,
                required_uncompressed_size: 2048,
            },
            chunk_size: ChunkSize::default(),
            skip: Skip(2),
            seek: 4096,
            count: Count::Limited(8),
            truncate: Truncate(false),
        },
        serde_json::from_value::<Raw>(json!({
            "mode": "raw",
            "size": 1024,
            "sha256sum": "cfe2be1c64b0387500853de0f48303e3de7b1c6f1508dc719eeafa0d41c36722",
            "install-if-different": "sha256sum",
            "target-type": "device",
            "target": "/dev/sdb",
            "compressed": true,
            "required-compressed-size": 1024,
            "required-uncompressed-size": 2048,
            "skip": 2,
            "seek": 4096,
            "count": 8,
            "truncate": false
        }))
        .unwrap()
    );
}

#[test]
fn defaults() {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    let raw = serde_json::from_value::<Raw>(json!({
        "mode": "raw",
        "size": 1024,
        "sha256sum": "cfe2be1c64b0387500853de0f48303e3de7b1c6f1508dc719eeafa0d41c36722",
        "target-type": "device",
        "target": "/dev/sdb"
    }))
    .unwrap();

    assert_eq!(raw.chunk_size, ChunkSize(128 * 1024));
    assert_eq!(raw.skip, Skip(0));
    assert_eq!(raw.seek, 0);
    assert_eq!(raw.count, Count::All);
    assert_eq!(raw.truncate, Truncate(true));
    assert!(!raw.metadata.compressed);
}
