// Copyright (C) 2018 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::{
    machine::{Context, StepTransition},
    CallbackReporter, Install, Result, State, StateChangeImpl, TransitionError,
};
use crate::{
    object::{info::Status, Info},
    update_package::{UpdatePackage, UpdatePackageExt},
    utils::log::LogContent,
};
use slog_scope::{debug, info};
use std::fs;

#[derive(Debug, PartialEq)]
pub(super) struct Download {
    pub(super) package: UpdatePackage,
}

impl CallbackReporter for Download {}

/// Implements the state change for `Download`.
///
/// Every object which is not ready is fetched into the download
/// directory. Partial files are resumed and corrupted ones are fetched
/// again.
#[async_trait::async_trait(?Send)]
impl StateChangeImpl for Download {
    fn name(&self) -> &'static str {
        "download"
    }

    fn package_uid(&self) -> Option<String> {
        Some(self.package.package_uid())
    }

    async fn handle(self, context: &mut Context) -> Result<(State, StepTransition)> {
        let download_dir = context.settings.update.download_dir.clone();
        let package_uid = self.package.package_uid();

        fs::create_dir_all(&download_dir)
            .log_error_msg("unable to create the download directory")?;
        self.package.clear_unrelated_files(&download_dir)?;

        for object in self.package.filter_objects(&download_dir, &[Status::Corrupted])? {
            debug!("removing corrupted object {}", object.sha256sum);
            fs::remove_file(download_dir.join(&object.sha256sum))?;
        }

        for object in self
            .package
            .filter_objects(&download_dir, &[Status::Missing, Status::Incomplete])?
        {
            info!("downloading object {} ({} bytes)", object.sha256sum, object.size);
            context
                .api
                .download_object(
                    &context.firmware.product_uid,
                    &package_uid,
                    &download_dir,
                    &object.sha256sum,
                )
                .await
                .log_error_msg("failed to download object")?;
        }

        if self
            .package
            .objects_metadata()?
            .iter()
            .all(|o| o.status(&download_dir).ok() == Some(Status::Ready))
        {
            debug!("moving to Install state as all objects are ready");
            Ok((State::Install(Install { package: self.package }), StepTransition::Immediate))
        } else {
            Err(TransitionError::ObjectsNotReady)
        }
    }
}
