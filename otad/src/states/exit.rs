// Copyright (C) 2020 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::{
    machine::{Context, StepTransition},
    Result, State, StateChangeImpl,
};

/// Terminal state, carrying the process exit code.
#[derive(Debug, Default, PartialEq)]
pub(super) struct Exit {
    pub(super) code: i32,
}

#[async_trait::async_trait(?Send)]
impl StateChangeImpl for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn is_preemptive_state(&self) -> bool {
        true
    }

    async fn handle(self, _: &mut Context) -> Result<(State, StepTransition)> {
        Ok((State::Exit(self), StepTransition::Never))
    }
}
