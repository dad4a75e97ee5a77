// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::{Error, Result};
use pkg_schema::definitions::Filesystem;
use slog_scope::trace;
use std::{io, path::Path};
use sys_mount::{Mount, Unmount, UnmountDrop};

pub(crate) struct MountGuard {
    _mount: UnmountDrop<Mount>,
    directory: tempfile::TempDir,
}

impl MountGuard {
    pub(crate) fn mount_point(&self) -> &Path {
        self.directory.path()
    }
}

pub(crate) fn ensure_disk_space(target: &Path, required: u64) -> Result<()> {
    trace!("looking for {} free bytes on {:?}", required, target);
    let stat = nix::sys::statvfs::statvfs(target)?;

    // stat fields might be 32 or 64 bytes depending on host arch
    #[allow(clippy::useless_conversion)]
    let available = u64::from(stat.fragment_size()) * u64::from(stat.blocks_available());

    if required > available {
        return Err(Error::NotEnoughSpace { available, required });
    }
    Ok(())
}

pub(crate) fn mount(source: &Path, fs: Filesystem, options: &str) -> io::Result<MountGuard> {
    let directory = tempfile::tempdir()?;
    let dest = directory.path();

    trace!("mounting {:?} as {} at {:?}", source, fs, &dest);

    let _mount = Mount::builder()
        .fstype(format!("{}", fs).as_str())
        .data(options)
        .flags(sys_mount::MountFlags::empty())
        .mount(source, dest)?
        .into_unmount_drop(sys_mount::UnmountFlags::DETACH);

    Ok(MountGuard { _mount, directory })
}

/// Mounts `source`, runs `f` over the mount point and unmounts it
/// again, whatever `f` returned.
pub(crate) fn mount_map<F, T>(source: &Path, fs: Filesystem, options: &str, f: F) -> Result<T>
where
    F: FnOnce(&Path) -> T,
{
    let guard = mount(source, fs, options)?;
    let res = f(guard.mount_point());
    trace!("unmounting {:?}", guard.mount_point());

    Ok(res)
}

pub(crate) fn chmod(path: &Path, mode: u32) -> Result<()> {
    trace!("applying 0o{:o} permissions to {:?}", mode, path);
    nix::sys::stat::fchmodat(
        None,
        path,
        nix::sys::stat::Mode::from_bits_truncate(mode),
        nix::sys::stat::FchmodatFlags::FollowSymlink,
    )?;

    Ok(())
}
