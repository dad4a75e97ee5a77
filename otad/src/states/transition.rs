// Copyright (C) 2018 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::{Result, TransitionError};
use slog_scope::{debug, warn};
use std::path::Path;

const STATE_CHANGE_CALLBACK: &str = "state-change-callback";

#[derive(Debug, PartialEq)]
pub(super) enum Transition {
    Continue,
    Cancel,
}

/// Asks the firmware whether `state` may run. The hook prints `cancel`
/// to veto it and nothing to let it go.
pub(super) fn state_change_callback(path: &Path, state: &'static str) -> Result<Transition> {
    let callback = path.join(STATE_CHANGE_CALLBACK);
    if !callback.exists() {
        return Ok(Transition::Continue);
    }

    debug!("running {} for '{}' state", STATE_CHANGE_CALLBACK, state);
    let output = easy_process::run(&format!("{} {}", callback.to_string_lossy(), state))?;
    output.stderr.lines().for_each(|err| warn!("{} (stderr): {}", STATE_CHANGE_CALLBACK, err));

    match output.stdout.trim() {
        "" => Ok(Transition::Continue),
        "cancel" => Ok(Transition::Cancel),
        other => Err(TransitionError::InvalidCallbackOutput {
            state,
            output: other.to_string(),
        }),
    }
}
