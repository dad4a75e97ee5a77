// Copyright (C) 2018 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::{
    machine::{Context, StepTransition},
    Poll, Result, State, StateChangeImpl,
};
use chrono::{Duration, Utc};
use slog_scope::{debug, info};

#[derive(Debug, PartialEq)]
pub(super) struct Idle {}

/// Implements the state change for `Idle`.
///
/// It waits for the next polling time, moving to `Poll` once it is
/// reached. A probe request skips the wait. When polling is disabled
/// it only leaves on request.
#[async_trait::async_trait(?Send)]
impl StateChangeImpl for Idle {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn is_preemptive_state(&self) -> bool {
        true
    }

    async fn handle(self, context: &mut Context) -> Result<(State, StepTransition)> {
        if context.take_probe_request() || context.runtime_settings.is_polling_forced() {
            info!("probe requested, moving to Poll state");
            return Ok((State::Poll(Poll {}), StepTransition::Immediate));
        }

        if !context.settings.polling.enabled {
            debug!("polling is disabled, staying on Idle state until awoken");
            return Ok((State::Idle(self), StepTransition::Never));
        }

        let next_polling = context.runtime_settings.next_polling().unwrap_or_else(|| {
            context.runtime_settings.last_polling() + context.settings.polling.interval
        });
        let delay = next_polling.signed_duration_since(Utc::now());

        if delay <= Duration::zero() {
            debug!("polling time reached, moving to Poll state");
            return Ok((State::Poll(Poll {}), StepTransition::Immediate));
        }

        debug!("moving to Poll state after {} seconds", delay.num_seconds());
        Ok((State::Poll(Poll {}), StepTransition::Delayed(delay)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::TestEnvironment;

    #[tokio::test]
    async fn polling_disabled() {
        let setup = TestEnvironment::build().disable_polling().finish();
        let mut context = setup.gen_context();

        let (machine, trans) = State::Idle(Idle {}).move_to_next_state(&mut context).await.unwrap();

        assert_state!(machine, Idle);
        assert!(matches!(trans, StepTransition::Never), "Unexpected transition: {:?}", trans);
    }

    #[tokio::test]
    async fn polling_disabled_with_probe_request() {
        let setup = TestEnvironment::build().disable_polling().finish();
        let mut context = setup.gen_context();
        context.probe.store(true, std::sync::atomic::Ordering::SeqCst);

        let (machine, trans) = State::Idle(Idle {}).move_to_next_state(&mut context).await.unwrap();

        assert_state!(machine, Poll);
        assert!(matches!(trans, StepTransition::Immediate));
        assert!(!context.take_probe_request());
    }

    #[tokio::test]
    async fn polling_in_time() {
        let setup = TestEnvironment::build().finish();
        let mut context = setup.gen_context();

        let (machine, trans) = State::Idle(Idle {}).move_to_next_state(&mut context).await.unwrap();

        assert_state!(machine, Poll);
        assert!(matches!(trans, StepTransition::Immediate), "Unexpected transition: {:?}", trans);
    }

    #[tokio::test]
    async fn normal_delay() {
        let setup = TestEnvironment::build().finish();
        let mut context = setup.gen_context();
        context.runtime_settings.set_last_polling(Utc::now() - Duration::minutes(10)).unwrap();

        let (machine, trans) = State::Idle(Idle {}).move_to_next_state(&mut context).await.unwrap();

        assert_state!(machine, Poll);
        match trans {
            StepTransition::Delayed(d) if d <= context.settings.polling.interval => {}
            _ => panic!("Unexpected StepTransition: {:?}", trans),
        }
    }

    #[tokio::test]
    async fn scheduled_next_polling() {
        let setup = TestEnvironment::build().finish();
        let mut context = setup.gen_context();
        context.runtime_settings.set_last_polling(Utc::now()).unwrap();
        context.runtime_settings.set_next_polling(Utc::now() + Duration::minutes(5)).unwrap();

        let (machine, trans) = State::Idle(Idle {}).move_to_next_state(&mut context).await.unwrap();

        assert_state!(machine, Poll);
        match trans {
            StepTransition::Delayed(d) if d <= Duration::minutes(5) => {}
            _ => panic!("Unexpected StepTransition: {:?}", trans),
        }
    }

    #[tokio::test]
    async fn forced_poll() {
        let setup = TestEnvironment::build().finish();
        let mut context = setup.gen_context();
        context.runtime_settings.set_last_polling(Utc::now()).unwrap();
        context.runtime_settings.force_poll().unwrap();

        let (machine, trans) = State::Idle(Idle {}).move_to_next_state(&mut context).await.unwrap();

        assert_state!(machine, Poll);
        assert!(matches!(trans, StepTransition::Immediate));
    }
}
