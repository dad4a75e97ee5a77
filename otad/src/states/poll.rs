// Copyright (C) 2018 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::{
    machine::{Context, StepTransition},
    CheckUpdate, Idle, Result, State, StateChangeImpl,
};
use crate::firmware::Metadata;
use chrono::{Duration, Utc};
use cloud::api::ProbeResponse;
use slog_scope::{debug, info, warn};

#[derive(Debug, PartialEq)]
pub(super) struct Poll {}

/// Implements the state change for `Poll`.
///
/// Asks the server for an update. A server failure is retried from
/// `Idle` following the backoff.
#[async_trait::async_trait(?Send)]
impl StateChangeImpl for Poll {
    fn name(&self) -> &'static str {
        "poll"
    }

    fn is_preemptive_state(&self) -> bool {
        true
    }

    async fn handle(self, context: &mut Context) -> Result<(State, StepTransition)> {
        if context.runtime_settings.is_polling_forced() {
            context.runtime_settings.disable_force_poll()?;
        }

        // Hooks may report new values after an update.
        context.firmware = Metadata::from_path(&context.settings.firmware.metadata)?;

        let retries = context.runtime_settings.retries();
        let response = match context.api.probe(retries, &context.firmware).await {
            Ok(response) => response,
            Err(e) => {
                context.runtime_settings.inc_retries()?;
                let delay = context.backoff();
                warn!("probe failed: {}, retrying in {} seconds", e, delay.num_seconds());
                context.runtime_settings.set_next_polling(Utc::now() + delay)?;

                return Ok((State::Idle(Idle {}), StepTransition::Immediate));
            }
        };

        let now = Utc::now();
        context.runtime_settings.set_last_polling(now)?;

        match response {
            ProbeResponse::NoUpdate => {
                info!("no update is currently available for this device");
                context.runtime_settings.clear_retries()?;
                context
                    .runtime_settings
                    .set_next_polling(now + context.settings.polling.interval)?;

                Ok((State::Idle(Idle {}), StepTransition::Immediate))
            }

            ProbeResponse::ExtraPoll(s) => {
                info!("server responded with extra poll of {} seconds", s);
                context.runtime_settings.set_next_polling(now + Duration::seconds(s))?;

                Ok((State::Idle(Idle {}), StepTransition::Immediate))
            }

            ProbeResponse::Update(package) => {
                info!("update received: {} ({})", package.version(), package.package_uid());
                context
                    .runtime_settings
                    .set_next_polling(now + context.settings.polling.interval)?;

                debug!("moving to CheckUpdate state to evaluate the update package");
                Ok((State::CheckUpdate(CheckUpdate { package }), StepTransition::Immediate))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        states::TransitionError,
        tests::{FakeApi, TestEnvironment},
        update_package::tests::get_update_package,
    };
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn update_not_available() {
        let setup = TestEnvironment::build().finish();
        let mut context = setup.gen_context();

        let (machine, _) = State::Poll(Poll {}).move_to_next_state(&mut context).await.unwrap();

        assert_state!(machine, Idle);
        assert_eq!(context.runtime_settings.retries(), 0);
        assert!(context.runtime_settings.last_polling() > Utc::now() - Duration::minutes(1));
        assert!(context.runtime_settings.next_polling().unwrap() > Utc::now());
    }

    #[tokio::test]
    async fn update_available() {
        let setup = TestEnvironment::build().finish();
        let mut context =
            setup.gen_context_with(FakeApi::default().with_update(get_update_package()));

        let (machine, _) = State::Poll(Poll {}).move_to_next_state(&mut context).await.unwrap();

        assert_state!(machine, CheckUpdate);
    }

    #[tokio::test]
    async fn extra_poll_interval() {
        let setup = TestEnvironment::build().finish();
        let mut context = setup.gen_context_with(FakeApi::default().with_extra_poll(10));

        let (machine, _) = State::Poll(Poll {}).move_to_next_state(&mut context).await.unwrap();

        assert_state!(machine, Idle);
        let next = context.runtime_settings.next_polling().unwrap();
        assert!(next <= Utc::now() + Duration::seconds(10));
        assert!(next > Utc::now() + Duration::seconds(5));
    }

    #[tokio::test]
    async fn probe_failure_backs_off() {
        let setup = TestEnvironment::build().finish();
        let mut context = setup.gen_context_with(FakeApi::default().failing_probe());
        context.settings.polling.retry_interval = Duration::minutes(1);

        for expected in [1, 2, 4] {
            let (machine, _) =
                State::Poll(Poll {}).move_to_next_state(&mut context).await.unwrap();
            assert_state!(machine, Idle);

            let delay = context.runtime_settings.next_polling().unwrap() - Utc::now();
            assert!(delay <= Duration::minutes(expected));
            assert!(delay > Duration::minutes(expected) - Duration::seconds(30));
        }
        assert_eq!(context.runtime_settings.retries(), 3);
    }

    #[tokio::test]
    async fn forced_poll_is_consumed() {
        let setup = TestEnvironment::build().finish();
        let mut context = setup.gen_context();
        context.runtime_settings.force_poll().unwrap();

        State::Poll(Poll {}).move_to_next_state(&mut context).await.unwrap();

        assert!(!context.runtime_settings.is_polling_forced());
    }

    #[tokio::test]
    async fn broken_firmware_metadata() {
        let setup = TestEnvironment::build().finish();
        let mut context = setup.gen_context();
        std::fs::remove_file(crate::firmware::tests::product_uid_hook(&setup.firmware.stored_path))
            .unwrap();

        match State::Poll(Poll {}).move_to_next_state(&mut context).await {
            Err(e @ TransitionError::Firmware(_)) => assert!(e.is_fatal()),
            res => panic!("Unexpected result: {:?}", res),
        }
    }
}
