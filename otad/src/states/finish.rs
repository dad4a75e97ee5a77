// Copyright (C) 2018 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::{
    machine::{Context, StepTransition},
    CallbackReporter, Exit, Idle, Result, State, StateChangeImpl,
};
use crate::{settings::FinishAction, update_package::UpdatePackage};
use slog_scope::info;

#[derive(Debug, PartialEq)]
pub(super) struct Finish {
    pub(super) package: UpdatePackage,
}

impl CallbackReporter for Finish {}

#[async_trait::async_trait(?Send)]
impl StateChangeImpl for Finish {
    fn name(&self) -> &'static str {
        "finish"
    }

    fn package_uid(&self) -> Option<String> {
        Some(self.package.package_uid())
    }

    async fn handle(self, context: &mut Context) -> Result<(State, StepTransition)> {
        context.runtime_settings.clear_retries()?;

        match context.settings.update.finish_action {
            FinishAction::Reboot => {
                info!("triggering reboot");
                let output = easy_process::run("reboot")?;
                if !output.stdout.is_empty() || !output.stderr.is_empty() {
                    info!("  reboot output: stdout: {}, stderr: {}", output.stdout, output.stderr);
                }
                Ok((State::Exit(Exit::default()), StepTransition::Immediate))
            }
            FinishAction::Exit => {
                info!("update finished, leaving");
                Ok((State::Exit(Exit::default()), StepTransition::Immediate))
            }
            FinishAction::Idle => {
                info!("update finished, returning to Idle");
                Ok((State::Idle(Idle {}), StepTransition::Immediate))
            }
        }
    }
}
