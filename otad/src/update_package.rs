// Copyright (C) 2017, 2018 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use crate::{
    firmware::Metadata,
    object::{self, Info},
};
use derive_more::{Display, Error, From};
use pkg_schema::ObjectMetadata;
use slog_scope::{debug, error};
use std::{fs, io, path::Path};

pub(crate) use cloud::api::UpdatePackage;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, From)]
pub enum Error {
    #[display(fmt = "Json parsing error: {}", _0)]
    JsonParsing(serde_json::Error),
    Io(io::Error),

    #[display(fmt = "Incompatible with hardware: {}", _0)]
    #[from(ignore)]
    IncompatibleHardware(#[error(not(source))] String),
}

pub(crate) trait UpdatePackageExt {
    fn objects_metadata(&self) -> Result<Vec<ObjectMetadata>>;
    fn compatible_with(&self, firmware: &Metadata) -> Result<()>;
    fn unsupported_modes(&self, supported: &[String]) -> Result<Vec<String>>;
    fn filter_objects(
        &self,
        download_dir: &Path,
        filter: &[object::info::Status],
    ) -> Result<Vec<ObjectMetadata>>;
    fn clear_unrelated_files(&self, download_dir: &Path) -> Result<()>;
}

impl UpdatePackageExt for UpdatePackage {
    /// Common fields of every object, in the order they were declared.
    fn objects_metadata(&self) -> Result<Vec<ObjectMetadata>> {
        Ok(self
            .inner
            .objects
            .iter()
            .map(|o| serde_json::from_value(o.clone()))
            .collect::<serde_json::Result<_>>()?)
    }

    fn compatible_with(&self, firmware: &Metadata) -> Result<()> {
        if self.inner.supported_hardware.is_compatible_with(&firmware.hardware) {
            return Ok(());
        }

        Err(Error::IncompatibleHardware(firmware.hardware.clone()))
    }

    fn unsupported_modes(&self, supported: &[String]) -> Result<Vec<String>> {
        let mut modes: Vec<_> = self
            .objects_metadata()?
            .into_iter()
            .map(|o| o.mode)
            .filter(|mode| !supported.contains(mode))
            .collect();
        modes.sort();
        modes.dedup();

        Ok(modes)
    }

    fn filter_objects(
        &self,
        download_dir: &Path,
        filter: &[object::info::Status],
    ) -> Result<Vec<ObjectMetadata>> {
        Ok(self
            .objects_metadata()?
            .into_iter()
            .filter(|o| {
                let status = o
                    .status(download_dir)
                    .map_err(|e| {
                        error!("fail accessing the object: {} (err: {})", o.sha256sum, e)
                    })
                    .unwrap_or(object::info::Status::Missing);
                filter.contains(&status)
            })
            .collect())
    }

    /// Removes every file of `download_dir` which is not an object of
    /// this package.
    fn clear_unrelated_files(&self, download_dir: &Path) -> Result<()> {
        if !download_dir.exists() {
            return Ok(());
        }

        let objects = self.objects_metadata()?;
        for entry in fs::read_dir(download_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if entry.file_type()?.is_file()
                && !objects.iter().any(|o| name.to_str() == Some(o.sha256sum.as_str()))
            {
                debug!("removing unrelated file {:?}", entry.path());
                fs::remove_file(entry.path())?;
            }
        }

        Ok(())
    }
}
