// Copyright (C) 2017, 2018 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

mod hook;


use self::hook::{run_hook, run_hooks_from_dir};
use derive_more::{Deref, DerefMut, Display, Error, From};
use slog_scope::{debug, error};
use std::{collections::BTreeMap, io, path::Path};

const PRODUCT_UID_HOOK: &str = "product-uid";
const VERSION_HOOK: &str = "version";
const HARDWARE_HOOK: &str = "hardware";
const DEVICE_IDENTITY_DIR: &str = "device-identity.d";
const DEVICE_ATTRIBUTES_DIR: &str = "device-attributes.d";
const ERROR_CALLBACK: &str = "error-callback";

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, From)]
pub enum Error {
    #[display(fmt = "product uid is missing")]
    MissingProductUid,
    #[display(fmt = "invalid product uid")]
    InvalidProductUid,
    #[display(fmt = "device identity is missing")]
    MissingDeviceIdentity,

    Io(io::Error),
    Process(easy_process::Error),
    Walkdir(walkdir::Error),
}

/// Metadata stores the firmware metadata information. It is
/// organized in multiple fields.
///
/// The Metadata is created loading its information from the running
/// firmware. It uses the `from_path` method for that.
#[derive(Clone, Debug, PartialEq)]
pub struct Metadata {
    /// Product UID which identifies the firmware on the management system
    pub product_uid: String,
    /// Version of firmware
    pub version: String,
    /// Hardware where the firmware is running
    pub hardware: String,
    /// Device Identity
    pub device_identity: MetadataValue,
    /// Device Attributes
    pub device_attributes: MetadataValue,
}

#[derive(Clone, Debug, Default, Deref, DerefMut, PartialEq)]
pub struct MetadataValue(pub BTreeMap<String, Vec<String>>);

impl Metadata {
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!("loading firmware metadata from {:?}", path);

        let metadata = Metadata {
            product_uid: run_hook(&path.join(PRODUCT_UID_HOOK))?,
            version: run_hook(&path.join(VERSION_HOOK))?,
            hardware: run_hook(&path.join(HARDWARE_HOOK))?,
            device_identity: run_hooks_from_dir(&path.join(DEVICE_IDENTITY_DIR))?,
            device_attributes: run_hooks_from_dir(&path.join(DEVICE_ATTRIBUTES_DIR))
                .unwrap_or_default(),
        };

        if metadata.product_uid.is_empty() {
            return Err(Error::MissingProductUid);
        }

        if metadata.product_uid.len() != 64 {
            return Err(Error::InvalidProductUid);
        }

        if metadata.device_identity.is_empty() {
            return Err(Error::MissingDeviceIdentity);
        }

        Ok(metadata)
    }

    pub(crate) fn as_cloud_metadata(&self) -> cloud::api::FirmwareMetadata<'_> {
        cloud::api::FirmwareMetadata {
            product_uid: &self.product_uid,
            version: &self.version,
            hardware: &self.hardware,
            device_identity: cloud::api::MetadataValue(&self.device_identity),
            device_attributes: cloud::api::MetadataValue(&self.device_attributes),
        }
    }
}

/// Runs the `error-callback` hook, when present, after an update
/// failure.
pub(crate) fn error_callback(path: &Path) -> Result<()> {
    let callback = path.join(ERROR_CALLBACK);
    if !callback.exists() {
        return Ok(());
    }

    let output = hook::run_script(&callback.to_string_lossy())?;
    if !output.is_empty() {
        error!("{} (stdout): {}", ERROR_CALLBACK, output);
    }

    Ok(())
}
