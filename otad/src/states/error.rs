// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::{
    machine::{Context, StepTransition},
    Exit, Idle, Result, State, StateChangeImpl, TransitionError,
};
use crate::firmware;
use chrono::Utc;
use slog_scope::{error, info};

#[derive(Debug)]
pub(super) struct Error {
    error: TransitionError,
}

/// Implements the state change for `Error`.
///
/// Recoverable errors schedule the next poll following the backoff
/// and return to `Idle`. Fatal ones leave the daemon.
#[async_trait::async_trait(?Send)]
impl StateChangeImpl for Error {
    fn name(&self) -> &'static str {
        "error"
    }

    fn is_preemptive_state(&self) -> bool {
        true
    }

    fn error_message(&self) -> Option<String> {
        Some(self.error.to_string())
    }

    async fn handle(self, context: &mut Context) -> Result<(State, StepTransition)> {
        error!("error state reached: {}", self.error);

        if let Err(err) = firmware::error_callback(&context.settings.firmware.metadata) {
            error!("failed to run error callback script: {}", err);
        }

        if self.error.is_fatal() {
            error!("unrecoverable error, leaving");
            return Ok((State::Exit(Exit { code: 1 }), StepTransition::Immediate));
        }

        context.runtime_settings.inc_retries()?;
        let delay = context.backoff();
        context.runtime_settings.set_next_polling(Utc::now() + delay)?;

        info!("returning to Idle state, retrying in {} seconds", delay.num_seconds());
        Ok((State::Idle(Idle {}), StepTransition::Immediate))
    }
}

impl From<TransitionError> for State {
    fn from(error: TransitionError) -> State {
        State::Error(Error { error })
    }
}
