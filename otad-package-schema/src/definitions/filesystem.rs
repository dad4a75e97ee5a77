// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use derive_more::Display;
use serde::Deserialize;

/// Filesystem type that must be used to mount device
#[derive(Deserialize, PartialEq, Eq, Debug, Copy, Clone, Display)]
#[serde(rename_all = "lowercase")]
pub enum Filesystem {
    #[display(fmt = "btrfs")]
    Btrfs,
    #[display(fmt = "ext2")]
    Ext2,
    #[display(fmt = "ext3")]
    Ext3,
    #[display(fmt = "ext4")]
    Ext4,
    #[display(fmt = "vfat")]
    Vfat,
    #[display(fmt = "f2fs")]
    F2fs,
    #[display(fmt = "jffs2")]
    Jffs2,
    #[display(fmt = "ubifs")]
    Ubifs,
    #[display(fmt = "xfs")]
    Xfs,
}
