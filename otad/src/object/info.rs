// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::Result;
use crate::utils;
use pkg_schema::ObjectMetadata;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Status {
    Missing,
    Incomplete,
    Corrupted,
    Ready,
}

pub(crate) trait Info {
    /// Status of the object's payload, stored as `<download_dir>/<sha256sum>`.
    fn status(&self, download_dir: &Path) -> Result<Status> {
        let object = download_dir.join(self.sha256sum());

        if !object.exists() {
            return Ok(Status::Missing);
        }

        if object.metadata()?.len() < self.len() {
            return Ok(Status::Incomplete);
        }

        let mut buf = [0; 4096];
        let mut reader = BufReader::new(File::open(object)?);
        let mut hasher = openssl::sha::Sha256::new();
        loop {
            let len = reader.read(&mut buf)?;
            if len == 0 {
                break;
            }
            hasher.update(&buf[..len]);
        }

        if utils::hex_encode(&hasher.finish()) != self.sha256sum() {
            return Ok(Status::Corrupted);
        }

        Ok(Status::Ready)
    }

    fn len(&self) -> u64;
    fn sha256sum(&self) -> &str;
}

impl Info for ObjectMetadata {
    fn len(&self) -> u64 {
        self.size
    }

    fn sha256sum(&self) -> &str {
        &self.sha256sum
    }
}
