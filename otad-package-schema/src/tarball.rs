// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use crate::{
    definitions::{CompressedSizes, Filesystem, Target},
    ObjectMetadata,
};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Clone, Deserialize, PartialEq, Debug)]
#[serde(rename_all = "kebab-case")]
pub struct Tarball {
    #[serde(flatten)]
    pub metadata: ObjectMetadata,
    #[serde(flatten)]
    pub target: Target,
    #[serde(flatten)]
    pub compression: CompressedSizes,

    pub filesystem: Filesystem,
    pub target_path: PathBuf,
    #[serde(default)]
    pub mount_options: String,
}

#[test]
fn deserialize() {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    assert_eq!(
        Tarball {
            metadata: ObjectMetadata {
                mode: "tarball".to_string(),
                sha256sum: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
                    .to_string(),
                size: 1024,
                compressed: false,
                install_if_different: None,
            },
            target: Target { target_type: "device".to_string(), target: PathBuf::from("/dev/sda") },
            compression: CompressedSizes::default(),
            filesystem: Filesystem::Ext4,
            target_path: PathBuf::from("/"),
            mount_options: String::default(),
        },
        serde_json::from_value::<Tarball>(json!({
            "mode": "tarball",
            "size": 1024,
            "sha256sum": "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            "target-type": "device",
            "target": "/dev/sda",
            "filesystem": "ext4",
            "target-path": "/"
        }))
        .unwrap()
    );
}
