// Copyright (C) 2017, 2018 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, TimeZone, Utc};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use slog_scope::{debug, warn};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, From)]
pub enum Error {
    Io(io::Error),
    SerdeJson(serde_json::Error),

    #[display(fmt = "invalid runtime settings destination")]
    InvalidDestination,
}

/// State kept across agent restarts.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct RuntimeSettings {
    pub polling: RuntimePolling,
    pub update: RuntimeUpdate,

    #[serde(skip)]
    pub(crate) path: PathBuf,
    #[serde(skip)]
    persistent: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct RuntimePolling {
    pub last: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<DateTime<Utc>>,
    pub retries: usize,
    pub now: bool,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct RuntimeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_package_uid: Option<String>,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        RuntimeSettings {
            polling: RuntimePolling {
                last: Utc.timestamp_opt(0, 0).single().unwrap_or_else(Utc::now),
                next: None,
                retries: 0,
                now: false,
            },
            update: RuntimeUpdate::default(),
            path: PathBuf::new(),
            persistent: false,
        }
    }
}

impl RuntimeSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let mut this = if path.exists() {
            debug!("loading runtime settings from {:?}", path);
            match fs::read_to_string(path)
                .map_err(Error::from)
                .and_then(|s| Ok(serde_json::from_str::<Self>(&s)?))
            {
                Ok(v) => v,
                Err(e) => {
                    warn!("failed to load current runtime settings: {}", e);
                    let mut old = path.as_os_str().to_owned();
                    old.push(".old");
                    if let Err(e) = fs::rename(path, &old) {
                        warn!("failed to move corrupted runtime settings away: {}", e);
                    }
                    debug!("using default runtime settings");
                    Self::default()
                }
            }
        } else {
            debug!("runtime settings file {:?} does not exists, using default settings", path);
            Self::default()
        };

        this.path = path.to_path_buf();
        Ok(this)
    }

    fn save(&self) -> Result<()> {
        if !self.persistent {
            debug!("skipping runtime settings save, using non-persistent");
            return Ok(());
        }

        let parent = self.path.parent().ok_or(Error::InvalidDestination)?;
        if !parent.exists() {
            debug!("creating runtime settings to store state");
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_json::to_string(self)?)?;
        debug!("saved runtime settings to {:?}", &self.path);

        Ok(())
    }

    pub(crate) fn enable_persistency(&mut self) {
        self.persistent = true;
    }

    pub(crate) fn is_polling_forced(&self) -> bool {
        self.polling.now
    }

    pub(crate) fn force_poll(&mut self) -> Result<()> {
        debug!("forcing poll");
        self.polling.now = true;
        self.save()
    }

    pub(crate) fn disable_force_poll(&mut self) -> Result<()> {
        debug!("disabling force poll");
        self.polling.now = false;
        self.save()
    }

    pub(crate) fn retries(&self) -> usize {
        self.polling.retries
    }

    pub(crate) fn inc_retries(&mut self) -> Result<()> {
        self.polling.retries += 1;
        self.save()
    }

    pub(crate) fn clear_retries(&mut self) -> Result<()> {
        self.polling.retries = 0;
        self.save()
    }

    pub(crate) fn last_polling(&self) -> DateTime<Utc> {
        self.polling.last
    }

    pub(crate) fn set_last_polling(&mut self, last_polling: DateTime<Utc>) -> Result<()> {
        debug!("updating last polling time");
        self.polling.last = last_polling;
        self.save()
    }

    pub(crate) fn next_polling(&self) -> Option<DateTime<Utc>> {
        self.polling.next
    }

    pub(crate) fn set_next_polling(&mut self, next_polling: DateTime<Utc>) -> Result<()> {
        debug!("scheduling next polling to {}", next_polling);
        self.polling.next = Some(next_polling);
        self.save()
    }

    pub(crate) fn applied_package_uid(&self) -> Option<&str> {
        self.update.applied_package_uid.as_deref()
    }

    pub(crate) fn set_applied_package_uid(&mut self, applied_package_uid: &str) -> Result<()> {
        debug!("marking package {} as installed", applied_package_uid);
        self.update.applied_package_uid = Some(applied_package_uid.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default() {
        let settings = RuntimeSettings::default();

        assert_eq!(settings.last_polling().timestamp(), 0);
        assert_eq!(settings.next_polling(), None);
        assert_eq!(settings.retries(), 0);
        assert!(!settings.is_polling_forced());
        assert_eq!(settings.applied_package_uid(), None);
    }

    #[test]
    fn load_and_save() {
        let tempfile = tempfile::NamedTempFile::new().unwrap();
        let settings_file = tempfile.path();
        fs::remove_file(settings_file).unwrap();

        let mut settings = RuntimeSettings::load(settings_file).unwrap();
        settings.enable_persistency();
        settings.set_applied_package_uid("some-package-uid").unwrap();
        settings.inc_retries().unwrap();
        settings.set_next_polling(Utc::now()).unwrap();

        let new_settings = RuntimeSettings::load(settings_file).unwrap();
        assert_eq!(settings.update, new_settings.update);
        assert_eq!(settings.polling, new_settings.polling);
    }

    #[test]
    fn non_persistent() {
        let dir = tempfile::tempdir().unwrap();
        let settings_file = dir.path().join("runtime_settings.conf");

        let mut settings = RuntimeSettings::load(&settings_file).unwrap();
        settings.set_applied_package_uid("some-package-uid").unwrap();
        assert!(!settings_file.exists());
    }

    #[test]
    fn load_bad_formated_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings_file = dir.path().join("runtime_settings.conf");
        fs::write(&settings_file, "foo").unwrap();

        let settings = RuntimeSettings::load(&settings_file).unwrap();
        assert_eq!(settings.polling, RuntimeSettings::default().polling);

        let old_file = dir.path().join("runtime_settings.conf.old");
        assert_eq!(
            fs::read_to_string(&old_file).unwrap(),
            "foo",
            "Old file should still be accessible as a .old file in the same directory"
        );
        assert!(!settings_file.exists());
    }
}
