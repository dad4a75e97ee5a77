// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

mod copy;
mod metadata;
mod raw;
mod tarball;

mod update_package;

/// Internal structures in the Objects for some type validation
pub mod definitions;
/// Objects representing each possible install mode
pub mod objects {
    pub use crate::{copy::Copy, raw::Raw, tarball::Tarball, test::Test};
}
pub use metadata::ObjectMetadata;
pub use update_package::{SupportedHardware, UpdatePackage};
