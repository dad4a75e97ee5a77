// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::{ensure_device_target, Error, Installer, Result};
use crate::utils;
use pkg_schema::{objects, ObjectMetadata};
use slog_scope::{debug, info};
use std::{
    fs,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

impl Installer for objects::Copy {
    fn metadata(&self) -> &ObjectMetadata {
        &self.metadata
    }

    fn setup(&mut self) -> Result<()> {
        info!("'copy' handler setup");
        ensure_device_target("copy", &self.target)
    }

    fn install(&mut self, download_dir: &Path) -> Result<()> {
        info!("'copy' handler install {} ({:?})", self.metadata.sha256sum, self.target_path);

        let obj: &Self = self;
        let source = download_dir.join(&obj.metadata.sha256sum);
        utils::fs::mount_map(&obj.target.target, obj.filesystem, &obj.mount_options, |path| {
            copy_into(obj, &source, path)
        })
        .map_err(Error::from)
        .and_then(|r| r)
    }
}

/// Copies the payload to `target-path` below `root`, the mount point
/// of the target device.
fn copy_into(obj: &objects::Copy, source: &Path, root: &Path) -> Result<()> {
    let required = if obj.metadata.compressed {
        obj.compression.required_uncompressed_size
    } else {
        obj.metadata.size
    };
    utils::fs::ensure_disk_space(root, required)?;

    let dest = root.join(obj.target_path.strip_prefix("/").unwrap_or(&obj.target_path));
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    debug!("copying {:?} to {:?}", source, dest);

    let chunk_size = pkg_schema::definitions::ChunkSize::default().0;
    let mut input = BufReader::with_capacity(chunk_size, fs::File::open(source)?);
    let mut output = BufWriter::with_capacity(
        chunk_size,
        fs::OpenOptions::new().write(true).create(true).truncate(true).open(&dest)?,
    );

    if obj.metadata.compressed {
        compress_tools::uncompress_data(&mut input, &mut output)?;
    } else {
        io::copy(&mut input, &mut output)?;
    }
    output.flush()?;

    if let Some(mode) = obj.target_permissions.target_mode {
        utils::fs::chmod(&dest, mode)?;
    }

    Ok(())
}
