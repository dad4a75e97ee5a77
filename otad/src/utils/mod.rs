// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

pub(crate) mod archive;
pub(crate) mod fs;
pub(crate) mod io;
pub(crate) mod log;

use derive_more::{Display, Error, From};
use std::fmt::Write;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, From)]
pub enum Error {
    Io(std::io::Error),
    Nix(nix::Error),
    Uncompress(compress_tools::Error),
    Process(easy_process::Error),

    #[display(
        fmt = "{available} is not enough storage space for installation, at least {required} is required"
    )]
    #[from(ignore)]
    NotEnoughSpace {
        available: u64,
        required: u64,
    },

    #[display(fmt = "{_0:?} already exists and overwriting is not allowed")]
    #[from(ignore)]
    ArchiveEntryExists(#[error(not(source))] std::path::PathBuf),
}

/// Encode a bytes stream in hex
#[inline]
pub(crate) fn hex_encode(data: &[u8]) -> String {
    data.iter().fold(String::new(), |mut output, c| {
        let _ = write!(output, "{c:02x}");

        output
    })
}
