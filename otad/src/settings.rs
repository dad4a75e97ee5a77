// Copyright (C) 2018 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use crate::serde_helpers;
use chrono::Duration;
use derive_more::{Display, Error, From};
use serde::Deserialize;
use slog_scope::{debug, error};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, From)]
pub enum Error {
    Io(io::Error),
    Deserialize(toml::de::Error),

    #[display(fmt = "invalid interval")]
    InvalidInterval,
    #[display(fmt = "invalid retry interval")]
    InvalidRetryInterval,
    #[display(fmt = "invalid server address")]
    InvalidServerAddress,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Settings {
    pub firmware: Firmware,
    pub network: Network,
    pub polling: Polling,
    pub storage: Storage,
    pub update: Update,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Firmware {
    /// Directory holding the firmware metadata hooks and callbacks.
    pub metadata: PathBuf,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Network {
    pub server_address: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Polling {
    pub enabled: bool,
    #[serde(deserialize_with = "serde_helpers::duration::deserialize")]
    pub interval: Duration,
    /// Base delay of the retry backoff.
    #[serde(deserialize_with = "serde_helpers::duration::deserialize")]
    pub retry_interval: Duration,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Storage {
    /// Determine if it should run on read-only mode or not. By
    /// default, read-only mode is disabled.
    pub read_only: bool,
    /// Define where the runtime settings are stored. By default,
    /// those are stored in `/var/lib/otad/runtime_settings.conf`.
    pub runtime_settings: PathBuf,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Update {
    pub download_dir: PathBuf,
    pub supported_install_modes: Vec<String>,
    pub finish_action: FinishAction,
}

/// What happens once an update is installed.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FinishAction {
    Reboot,
    Exit,
    Idle,
}

impl Default for Firmware {
    fn default() -> Self {
        Firmware { metadata: "/usr/share/otad".into() }
    }
}

impl Default for Network {
    fn default() -> Self {
        Network { server_address: "http://localhost:8080".to_string() }
    }
}

impl Default for Polling {
    fn default() -> Self {
        Polling { enabled: true, interval: Duration::days(1), retry_interval: Duration::minutes(5) }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Storage { read_only: false, runtime_settings: "/var/lib/otad/runtime_settings.conf".into() }
    }
}

impl Default for Update {
    fn default() -> Self {
        Update {
            download_dir: "/tmp/otad".into(),
            supported_install_modes: ["copy", "raw", "tarball", "test"]
                .iter()
                .map(|i| (*i).to_string())
                .collect(),
            finish_action: FinishAction::default(),
        }
    }
}

impl Default for FinishAction {
    fn default() -> Self {
        FinishAction::Reboot
    }
}

impl Settings {
    /// Loads the settings from the filesystem. If `path` does not
    /// exists, it uses the default settings.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("loading system settings from {:?}...", path);
            Ok(Self::parse(&fs::read_to_string(path)?)?)
        } else {
            debug!("system settings file {:?} does not exists, using default settings...", path);
            Ok(Self::default())
        }
    }

    // This parses the configuration file, taking into account the
    // needed validations for all fields, and returns either `Self` or
    // `Err`.
    fn parse(content: &str) -> Result<Self> {
        let settings = toml::from_str::<Settings>(content)?;

        if settings.polling.interval < Duration::seconds(60) {
            error!("invalid setting for polling interval, it cannot be less than 60 seconds");
            return Err(Error::InvalidInterval);
        }

        if settings.polling.retry_interval <= Duration::zero() {
            error!("invalid setting for polling retry interval, it must be positive");
            return Err(Error::InvalidRetryInterval);
        }

        if !settings.network.server_address.starts_with("http://")
            && !settings.network.server_address.starts_with("https://")
        {
            error!("invalid setting for server address, it must use the protocol prefix");
            return Err(Error::InvalidServerAddress);
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn basic_config() {
        let sample = r#"
[network]
server_address="https://ota.example.com"

[storage]
read_only = false
runtime_settings="/data/otad/state.data"

[polling]
enabled=true
interval="60s"
retry_interval="10s"

[update]
download_dir="/tmp/otad"
supported_install_modes=["copy", "tarball"]
finish_action="exit"

[firmware]
metadata="/usr/share/otad"
"#;
        let expected = Settings {
            polling: Polling {
                enabled: true,
                interval: Duration::minutes(1),
                retry_interval: Duration::seconds(10),
            },
            storage: Storage {
                read_only: false,
                runtime_settings: "/data/otad/state.data".into(),
            },
            update: Update {
                download_dir: "/tmp/otad".into(),
                supported_install_modes: ["copy", "tarball"]
                    .iter()
                    .map(|i| (*i).to_string())
                    .collect(),
                finish_action: FinishAction::Exit,
            },
            network: Network { server_address: "https://ota.example.com".to_string() },
            firmware: Firmware { metadata: "/usr/share/otad".into() },
        };
        assert_eq!(Settings::parse(sample).unwrap(), expected);
    }

    #[test]
    fn partial_config() {
        let sample = r#"
[polling]
interval="2h"
"#;
        let settings = Settings::parse(sample).unwrap();
        assert_eq!(settings.polling.interval, Duration::hours(2));
        assert_eq!(settings.update, Update::default());
        assert_eq!(settings.storage, Storage::default());
    }

    #[test]
    fn invalid_polling_interval() {
        let sample = r#"
[polling]
enabled=true
interval="59s"
"#;
        assert!(matches!(Settings::parse(sample), Err(Error::InvalidInterval)));
    }

    #[test]
    fn invalid_retry_interval() {
        let sample = r#"
[polling]
retry_interval="0s"
"#;
        assert!(matches!(Settings::parse(sample), Err(Error::InvalidRetryInterval)));
    }

    #[test]
    fn invalid_network_server_address() {
        let sample = r#"
[network]
server_address="ota.example.com"
"#;
        assert!(matches!(Settings::parse(sample), Err(Error::InvalidServerAddress)));
    }

    #[test]
    fn unknown_field() {
        let sample = r#"
[network]
listen_socket="localhost:8080"
"#;
        assert!(matches!(Settings::parse(sample), Err(Error::Deserialize(_))));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load(&dir.path().join("otad.conf")).unwrap(), Settings::default());
    }

    #[test]
    fn default() {
        let settings = Settings::default();

        assert_eq!(settings.polling.interval, Duration::days(1));
        assert_eq!(settings.polling.retry_interval, Duration::minutes(5));
        assert!(settings.polling.enabled);
        assert_eq!(settings.update.finish_action, FinishAction::Reboot);
        assert_eq!(settings.update.supported_install_modes, ["copy", "raw", "tarball", "test"]);
    }
}
