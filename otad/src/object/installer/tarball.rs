// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::{ensure_device_target, Error, Installer, Result};
use crate::utils;
use pkg_schema::{objects, ObjectMetadata};
use slog_scope::info;
use std::{fs, path::Path};

impl Installer for objects::Tarball {
    fn metadata(&self) -> &ObjectMetadata {
        &self.metadata
    }

    fn setup(&mut self) -> Result<()> {
        info!("'tarball' handler setup");
        ensure_device_target("tarball", &self.target)
    }

    fn install(&mut self, download_dir: &Path) -> Result<()> {
        info!("'tarball' handler install {} ({:?})", self.metadata.sha256sum, self.target_path);

        let obj: &Self = self;
        let source = download_dir.join(&obj.metadata.sha256sum);
        utils::fs::mount_map(&obj.target.target, obj.filesystem, &obj.mount_options, |path| {
            unpack_into(obj, &source, path)
        })
        .map_err(Error::from)
        .and_then(|r| r)
    }
}

fn unpack_into(obj: &objects::Tarball, source: &Path, root: &Path) -> Result<()> {
    if obj.compression.required_uncompressed_size > 0 {
        utils::fs::ensure_disk_space(root, obj.compression.required_uncompressed_size)?;
    }

    let dest = root.join(obj.target_path.strip_prefix("/").unwrap_or(&obj.target_path));
    fs::create_dir_all(&dest)?;

    Ok(utils::archive::unpack(source, &dest, true)?)
}
