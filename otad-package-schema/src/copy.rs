// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use crate::{
    definitions::{CompressedSizes, Filesystem, Target, TargetPermissions},
    ObjectMetadata,
};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Clone, Deserialize, PartialEq, Debug)]
#[serde(rename_all = "kebab-case")]
pub struct Copy {
    #[serde(flatten)]
    pub metadata: ObjectMetadata,
    #[serde(flatten)]
    pub target: Target,
    #[serde(flatten)]
    pub compression: CompressedSizes,

    pub filesystem: Filesystem,
    pub target_path: PathBuf,
    #[serde(flatten)]
    pub target_permissions: TargetPermissions,
    #[serde(default)]
    pub mount_options: String,
}

#[test]
fn deserialize() {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    assert_eq!(
        Copy {
            metadata: ObjectMetadata {
                mode: "copy".to_string(),
                sha256sum: "cfe2be1c64b0387500853de0f48303e3de7b1c6f1508dc719eeafa0d41c36722"
                    .to_string(),
                size: 1024,
                compressed: false,
                install_if_different: None,
            },
            target: Target { target_type: "device".to_string(), target: PathBuf::from("/dev/sda") },
            compression: CompressedSizes::default(),
            filesystem: Filesystem::Btrfs,
            target_path: PathBuf::from("/etc/passwd"),
            target_permissions: TargetPermissions { target_mode: Some(0o644) },
            mount_options: String::default(),
        },
        serde_json::from_value::<Copy>(json!({
            "mode": "copy",
            "size": 1024,
            "sha256sum": "cfe2be1c64b0387500853de0f48303e3de7b1c6f1508dc719eeafa0d41c36722",
            "filesystem": "btrfs",
            "target-type": "device",
            "target": "/dev/sda",
            "target-path": "/etc/passwd",
            "target-mode": "0644"
        }))
        .unwrap()
    );
}
