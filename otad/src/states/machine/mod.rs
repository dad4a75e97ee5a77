// Copyright (C) 2020 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::{State, StateChangeImpl};
use crate::{
    client::Api, firmware::Metadata, object::Registry, runtime_settings::RuntimeSettings,
    settings::Settings,
};
use async_channel as channel;
use slog_scope::{info, trace, warn};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

pub(super) struct StateMachine {
    state: State,
    context: Context,
}

pub(crate) struct Context {
    pub(super) waker: Channel<()>,
    pub(super) stop: Arc<AtomicBool>,
    pub(super) probe: Arc<AtomicBool>,
    pub(crate) settings: Settings,
    pub(crate) runtime_settings: RuntimeSettings,
    pub(crate) firmware: Metadata,
    pub(crate) api: Box<dyn Api>,
    pub(crate) registry: Registry,
}

pub(super) struct Channel<T> {
    pub(super) sender: channel::Sender<T>,
    pub(super) receiver: channel::Receiver<T>,
}

impl<T> Channel<T> {
    fn new(cap: usize) -> Self {
        let (sender, receiver) = channel::bounded(cap);
        Channel { sender, receiver }
    }
}

/// Controls a running agent from outside of its loop.
#[derive(Clone)]
pub struct Handle {
    stop: Arc<AtomicBool>,
    probe: Arc<AtomicBool>,
    waker: channel::Sender<()>,
}

impl Handle {
    /// Requests the agent to leave at the next state which can be
    /// safely interrupted.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        let _ = self.waker.try_send(());
    }

    /// Requests an immediate check for updates.
    pub fn trigger_probe(&self) {
        self.probe.store(true, Ordering::SeqCst);
        let _ = self.waker.try_send(());
    }
}

impl Context {
    pub(crate) fn new(
        settings: Settings,
        runtime_settings: RuntimeSettings,
        firmware: Metadata,
        api: Box<dyn Api>,
        registry: Registry,
    ) -> Self {
        Context {
            waker: Channel::new(1),
            stop: Arc::default(),
            probe: Arc::default(),
            settings,
            runtime_settings,
            firmware,
            api,
            registry,
        }
    }

    pub(super) fn is_stopping(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Consumes a pending probe request, if any.
    pub(super) fn take_probe_request(&self) -> bool {
        self.probe.swap(false, Ordering::SeqCst)
    }

    /// Delay before the next attempt after a failure, doubling on
    /// every retry and bounded by the polling interval.
    pub(super) fn backoff(&self) -> chrono::Duration {
        let polling = &self.settings.polling;
        let exponent = self.runtime_settings.retries().saturating_sub(1).min(30) as u32;

        polling
            .retry_interval
            .checked_mul(2_i32.pow(exponent))
            .map_or(polling.interval, |delay| delay.min(polling.interval))
    }
}

#[derive(Debug)]
pub(super) enum StepTransition {
    Delayed(chrono::Duration),
    Immediate,
    Never,
}

impl StateMachine {
    pub(super) fn new(state: State, context: Context) -> Self {
        StateMachine { state, context }
    }

    pub(super) fn handle(&self) -> Handle {
        Handle {
            stop: self.context.stop.clone(),
            probe: self.context.probe.clone(),
            waker: self.context.waker.sender.clone(),
        }
    }

    pub(super) async fn start(mut self) -> i32 {
        loop {
            // Since the loop is already currently running, we can
            // discharges any wake message received.
            let _ = self.context.waker.receiver.try_recv();

            if self.context.is_stopping() && self.state.is_preemptive_state() {
                info!("stop requested, leaving on '{}' state", self.state.name());
                return 0;
            }

            self.report_current_state().await;

            let (state, transition) = self
                .state
                .move_to_next_state(&mut self.context)
                .await
                .unwrap_or_else(|e| (State::from(e), StepTransition::Immediate));
            self.state = state;

            if let State::Exit(exit) = &self.state {
                info!("exiting with code {}", exit.code);
                return exit.code;
            }

            match transition {
                StepTransition::Immediate => {}
                StepTransition::Delayed(t) => {
                    trace!("delaying transition for: {} seconds", t.num_seconds());
                    let waker = self.context.waker.receiver.clone();
                    tokio::select! {
                        _ = tokio::time::sleep(t.to_std().unwrap_or_default()) => {}
                        _ = waker.recv() => trace!("woken up before the delay expired"),
                    }
                }
                StepTransition::Never => {
                    trace!("stopping transition until awoken");
                    let _ = self.context.waker.receiver.recv().await;
                }
            }
        }
    }

    async fn report_current_state(&self) {
        let name = self.state.name();
        if let Err(e) = self
            .context
            .api
            .report(
                name,
                &self.context.firmware,
                self.state.package_uid().as_deref(),
                self.state.error_message(),
            )
            .await
        {
            warn!("unable to report '{}' state: {}", name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::TestEnvironment;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    #[test]
    fn backoff_doubles_up_to_interval() {
        let setup = TestEnvironment::build().finish();
        let mut context = setup.gen_context();
        context.settings.polling.retry_interval = Duration::minutes(5);
        context.settings.polling.interval = Duration::hours(1);

        let mut delays = Vec::new();
        for _ in 0..6 {
            context.runtime_settings.inc_retries().unwrap();
            delays.push(context.backoff().num_minutes());
        }

        assert_eq!(delays, [5, 10, 20, 40, 60, 60]);
    }

    #[test]
    fn backoff_without_retries() {
        let setup = TestEnvironment::build().finish();
        let mut context = setup.gen_context();
        context.settings.polling.retry_interval = Duration::minutes(5);

        assert_eq!(context.backoff(), Duration::minutes(5));
    }

    #[test]
    fn handle_requests() {
        let setup = TestEnvironment::build().finish();
        let context = setup.gen_context();
        let machine = StateMachine::new(State::Idle(super::super::Idle {}), context);
        let handle = machine.handle();

        assert!(!machine.context.take_probe_request());
        handle.trigger_probe();
        assert!(machine.context.take_probe_request());
        assert!(!machine.context.take_probe_request());

        assert!(!machine.context.is_stopping());
        handle.stop();
        assert!(machine.context.is_stopping());
        assert!(machine.context.waker.receiver.try_recv().is_ok());
    }
}
