// Copyright (C) 2018 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::{
    machine::{Context, StepTransition},
    CallbackReporter, Finish, Result, State, StateChangeImpl, TransitionError,
};
use crate::{
    object::{info::Status, installer, Info},
    update_package::{UpdatePackage, UpdatePackageExt},
    utils::log::LogContent,
};
use slog_scope::info;

#[derive(Debug, PartialEq)]
pub(super) struct Install {
    pub(super) package: UpdatePackage,
}

impl CallbackReporter for Install {}

#[async_trait::async_trait(?Send)]
impl StateChangeImpl for Install {
    fn name(&self) -> &'static str {
        "install"
    }

    fn package_uid(&self) -> Option<String> {
        Some(self.package.package_uid())
    }

    async fn handle(self, context: &mut Context) -> Result<(State, StepTransition)> {
        let package_uid = self.package.package_uid();
        let download_dir = &context.settings.update.download_dir;
        info!("installing update: {} ({})", self.package.version(), &package_uid);

        let mut objects = self
            .package
            .objects_metadata()?
            .into_iter()
            .zip(self.package.inner.objects.iter())
            .collect::<Vec<_>>();

        // Objects are sorted in reverse order so the smaller objects are installed
        // later. This postpones objects like bootloader updates towards the end of
        // the update.
        objects.sort_by(|(a, _), (b, _)| b.size.cmp(&a.size));

        for (metadata, _) in &objects {
            let status = metadata.status(download_dir)?;
            if status != Status::Ready {
                return Err(TransitionError::ObjectNotReady {
                    sha256sum: metadata.sha256sum.clone(),
                    status,
                });
            }
        }

        // Every object is decoded before anything is written.
        let mut installers = objects
            .into_iter()
            .map(|(_, document)| context.registry.decode_value(document.clone()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .log_error_msg("unable to decode the update package objects")?;

        for obj in installers.iter_mut() {
            installer::run(obj.as_mut(), download_dir)
                .log_error_msg("failed to install object")?;
        }

        // Avoid installing same package twice.
        context
            .runtime_settings
            .set_applied_package_uid(&package_uid)
            .log_error_msg("failed to set applied package uid to runtime settings")?;

        info!("update installed successfully");
        Ok((State::Finish(Finish { package: self.package }), StepTransition::Immediate))
    }
}
