// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::{Error, Result};
use compress_tools::Ownership;
use slog_scope::{debug, trace};
use std::{fs, path::Path};

/// Extracts every entry of `archive` below `dest`, keeping the
/// archived relative paths.
///
/// With `overwrite` unset the archive listing is checked first and the
/// call fails, before writing anything, when an entry already exists
/// in `dest`.
pub(crate) fn unpack(archive: &Path, dest: &Path, overwrite: bool) -> Result<()> {
    debug!("unpacking {:?} into {:?}", archive, dest);

    if !overwrite {
        for entry in compress_tools::list_archive_files(fs::File::open(archive)?)? {
            let path = dest.join(&entry);
            let exists = path.symlink_metadata().map(|m| !m.is_dir()).unwrap_or(false);
            trace!("checking entry {} ({})", entry, if exists { "exists" } else { "new" });
            if exists {
                return Err(Error::ArchiveEntryExists(path));
            }
        }
    }

    compress_tools::uncompress_archive(fs::File::open(archive)?, dest, Ownership::Ignore)?;

    Ok(())
}
