// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

mod copy;
mod raw;
mod tarball;

use super::{Error, Result};
use pkg_schema::{definitions::Target, ObjectMetadata};
use slog_scope::{debug, warn};
use std::path::Path;

/// How a single payload is applied to the device.
///
/// An object is decoded for one update attempt and goes through
/// `setup`, `install` and `cleanup` exactly once.
pub(crate) trait Installer {
    fn metadata(&self) -> &ObjectMetadata;

    /// Validates the object before any I/O happens.
    fn setup(&mut self) -> Result<()> {
        debug!("running default setup");
        Ok(())
    }

    /// Installs the payload stored as `<download_dir>/<sha256sum>`.
    fn install(&mut self, download_dir: &Path) -> Result<()>;

    fn cleanup(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Runs `setup`, `install` and `cleanup` on `object`. Cleanup runs
/// even when a previous step fails, the first error is returned.
pub(crate) fn run(object: &mut dyn Installer, download_dir: &Path) -> Result<()> {
    let res = object.setup().and_then(|_| object.install(download_dir));
    let cleanup = object.cleanup();

    if let (Err(_), Err(e)) = (&res, &cleanup) {
        warn!("cleanup of '{}' object failed: {}", object.metadata().mode, e);
    }

    res.and(cleanup)
}

fn ensure_device_target(handler: &'static str, target: &Target) -> Result<()> {
    if target.is_device() {
        return Ok(());
    }

    Err(Error::UnsupportedTargetType { handler, target_type: target.target_type.clone() })
}
