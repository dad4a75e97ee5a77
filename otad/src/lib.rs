// Copyright (C) 2018, 2019, 2020 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

mod client;
mod firmware;
pub mod logger;
mod object;
mod runtime_settings;
mod serde_helpers;
mod settings;
mod states;
mod update_package;
mod utils;


pub use crate::{
    settings::Settings,
    states::{Agent, Handle},
};
use derive_more::{Display, Error, From};

const VERSION: &str = env!("VERSION");

/// Returns the version in use, including the commit and if there is
/// uncommited modification in the source.
pub fn version() -> &'static str {
    VERSION
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, From)]
pub enum Error {
    #[display(fmt = "Runtime settings error: {}", _0)]
    RuntimeSettings(crate::runtime_settings::Error),
    #[display(fmt = "Settings error: {}", _0)]
    Settings(crate::settings::Error),
    #[display(fmt = "Firmware error: {}", _0)]
    Firmware(crate::firmware::Error),
    #[display(fmt = "Io error: {}", _0)]
    Io(std::io::Error),
}

/// Runs the agent described by `settings` until it exits, returning
/// the process exit code.
pub async fn run(settings: Settings) -> Result<i32> {
    Ok(Agent::new(settings)?.run().await)
}
