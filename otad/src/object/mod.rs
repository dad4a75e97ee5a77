// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

pub(crate) mod decoder;
pub(crate) mod info;
pub(crate) mod installer;

pub(crate) use self::{decoder::Registry, info::Info, installer::Installer};
use derive_more::{Display, Error, From};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, From)]
pub enum Error {
    #[display(
        fmt = "target-type '{}' is not supported for the '{}' handler. Its value must be 'device'",
        target_type,
        handler
    )]
    UnsupportedTargetType { handler: &'static str, target_type: String },

    #[display(fmt = "setup of '{}' object was forced to fail", _0)]
    #[from(ignore)]
    ForcedSetupFailure(#[error(not(source))] String),

    Utils(crate::utils::Error),
    Io(std::io::Error),
    Uncompress(compress_tools::Error),
}
