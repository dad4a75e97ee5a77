// Copyright (C) 2020 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::{
    machine::{Context, StepTransition},
    Download, Idle, Result, State, StateChangeImpl,
};
use crate::update_package::{UpdatePackage, UpdatePackageExt};
use slog_scope::{debug, info, warn};

#[derive(Debug, PartialEq)]
pub(super) struct CheckUpdate {
    pub(super) package: UpdatePackage,
}

/// Implements the state change for `CheckUpdate`.
///
/// Packages which do not fit the device, or which were already
/// applied, are dropped and the agent goes back to `Idle`.
#[async_trait::async_trait(?Send)]
impl StateChangeImpl for CheckUpdate {
    fn name(&self) -> &'static str {
        "check_update"
    }

    fn is_preemptive_state(&self) -> bool {
        true
    }

    fn package_uid(&self) -> Option<String> {
        Some(self.package.package_uid())
    }

    async fn handle(self, context: &mut Context) -> Result<(State, StepTransition)> {
        let package_uid = self.package.package_uid();

        if let Err(e) = self.package.compatible_with(&context.firmware) {
            warn!("ignoring update package {}: {}", package_uid, e);
            return Ok((State::Idle(Idle {}), StepTransition::Immediate));
        }

        if context.runtime_settings.applied_package_uid() == Some(package_uid.as_str()) {
            info!("not applying the update package. Same package has already been installed.");
            debug!("moving to Idle state as this update package is already installed");
            return Ok((State::Idle(Idle {}), StepTransition::Immediate));
        }

        let unsupported =
            self.package.unsupported_modes(&context.settings.update.supported_install_modes)?;
        if !unsupported.is_empty() {
            warn!(
                "ignoring update package {}: install modes {:?} are not supported",
                package_uid, unsupported
            );
            return Ok((State::Idle(Idle {}), StepTransition::Immediate));
        }

        debug!("moving to Download state to process the update package");
        Ok((State::Download(Download { package: self.package }), StepTransition::Immediate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        tests::TestEnvironment,
        update_package::tests::{get_update_package, update_package_with},
    };
    use serde_json::json;

    #[tokio::test]
    async fn normal_transition() {
        let setup = TestEnvironment::build().finish();
        let mut context = setup.gen_context();
        let package = get_update_package();

        let (machine, _) = State::CheckUpdate(CheckUpdate { package })
            .move_to_next_state(&mut context)
            .await
            .unwrap();

        assert_state!(machine, Download);
    }

    #[tokio::test]
    async fn invalid_hardware() {
        let setup = TestEnvironment::build().invalid_hardware().finish();
        let mut context = setup.gen_context();
        let package = get_update_package();

        let (machine, _) = State::CheckUpdate(CheckUpdate { package })
            .move_to_next_state(&mut context)
            .await
            .unwrap();

        assert_state!(machine, Idle);
    }

    #[tokio::test]
    async fn skip_same_package_uid() {
        let setup = TestEnvironment::build().finish();
        let mut context = setup.gen_context();
        let package = get_update_package();
        context.runtime_settings.set_applied_package_uid(&package.package_uid()).unwrap();

        let (machine, _) = State::CheckUpdate(CheckUpdate { package })
            .move_to_next_state(&mut context)
            .await
            .unwrap();

        assert_state!(machine, Idle);
    }

    #[tokio::test]
    async fn unsupported_install_mode() {
        let setup = TestEnvironment::build().finish();
        let mut context = setup.gen_context();
        context.settings.update.supported_install_modes = vec!["test".into()];
        let package = update_package_with(vec![json!({
            "mode": "raw",
            "sha256sum": "cfe2be1c64b0387500853de0f48303e3de7b1c6f1508dc719eeafa0d41c36722",
            "size": 1024,
            "target-type": "device",
            "target": "/dev/sda1"
        })]);

        let (machine, _) = State::CheckUpdate(CheckUpdate { package })
            .move_to_next_state(&mut context)
            .await
            .unwrap();

        assert_state!(machine, Idle);
    }
}
