// Copyright (C) 2018 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

#[macro_use]
mod macros;
mod check_update;
mod download;
mod error;
mod exit;
mod finish;
mod idle;
mod install;
pub(crate) mod machine;
mod poll;
mod transition;


use self::{
    check_update::CheckUpdate,
    download::Download,
    error::Error,
    exit::Exit,
    finish::Finish,
    idle::Idle,
    install::Install,
    machine::{Context, StepTransition},
    poll::Poll,
};
use crate::{
    client::{Api, CloudApi},
    firmware::{self, Metadata},
    object::{self, Registry},
    runtime_settings::{self, RuntimeSettings},
    settings::Settings,
    update_package,
};
use derive_more::{Display, Error as DeriveError, From};
use slog_scope::info;

pub use self::machine::Handle;

pub type Result<T> = std::result::Result<T, TransitionError>;

#[derive(Debug, Display, DeriveError, From)]
pub enum TransitionError {
    #[display(fmt = "firmware error: {}", _0)]
    Firmware(firmware::Error),
    #[display(fmt = "client error: {}", _0)]
    Client(cloud::Error),
    #[display(fmt = "object decoding error: {}", _0)]
    Decoder(object::decoder::Error),
    #[display(fmt = "install error: {}", _0)]
    Object(object::Error),
    #[display(fmt = "runtime settings error: {}", _0)]
    RuntimeSettings(runtime_settings::Error),
    #[display(fmt = "update package error: {}", _0)]
    UpdatePackage(update_package::Error),
    #[display(fmt = "process error: {}", _0)]
    Process(easy_process::Error),
    Io(std::io::Error),

    #[display(fmt = "not all objects are ready for use")]
    ObjectsNotReady,
    #[display(fmt = "object {} is not ready for install ({:?})", sha256sum, status)]
    #[from(ignore)]
    ObjectNotReady { sha256sum: String, status: object::info::Status },
    #[display(fmt = "state-change-callback printed {:?} for '{}' state", output, state)]
    #[from(ignore)]
    InvalidCallbackOutput { state: &'static str, output: String },
}

impl TransitionError {
    /// Fatal errors leave the daemon, anything else is retried later.
    pub(crate) fn is_fatal(&self) -> bool {
        matches!(self, TransitionError::Firmware(_))
    }
}

#[async_trait::async_trait(?Send)]
trait StateChangeImpl {
    async fn handle(self, context: &mut Context) -> Result<(State, StepTransition)>
    where
        Self: Sized;

    fn name(&self) -> &'static str;

    /// States where the machine may stop on request.
    fn is_preemptive_state(&self) -> bool {
        false
    }

    fn package_uid(&self) -> Option<String> {
        None
    }

    fn error_message(&self) -> Option<String> {
        None
    }
}

/// States guarded by the `state-change-callback` hook.
#[async_trait::async_trait(?Send)]
trait CallbackReporter: StateChangeImpl + Sized {
    async fn handle_with_callback(self, context: &mut Context) -> Result<(State, StepTransition)> {
        use transition::{state_change_callback, Transition};

        match state_change_callback(&context.settings.firmware.metadata, self.name())? {
            Transition::Continue => self.handle(context).await,
            Transition::Cancel => {
                info!("cancelling transition to '{}' due to state change callback", self.name());
                Ok((State::Idle(Idle {}), StepTransition::Immediate))
            }
        }
    }
}

#[derive(Debug)]
enum State {
    Idle(Idle),
    Poll(Poll),
    CheckUpdate(CheckUpdate),
    Download(Download),
    Install(Install),
    Finish(Finish),
    Error(Error),
    Exit(Exit),
}

impl State {
    async fn move_to_next_state(self, context: &mut Context) -> Result<(State, StepTransition)> {
        match self {
            State::Idle(s) => s.handle(context).await,
            State::Poll(s) => s.handle(context).await,
            State::CheckUpdate(s) => s.handle(context).await,
            State::Download(s) => s.handle_with_callback(context).await,
            State::Install(s) => s.handle_with_callback(context).await,
            State::Finish(s) => s.handle_with_callback(context).await,
            State::Error(s) => s.handle(context).await,
            State::Exit(s) => s.handle(context).await,
        }
    }

    fn for_any_state<F, A>(&self, f: F) -> A
    where
        F: Fn(&dyn StateChangeImpl) -> A,
    {
        match self {
            State::Idle(s) => f(s),
            State::Poll(s) => f(s),
            State::CheckUpdate(s) => f(s),
            State::Download(s) => f(s),
            State::Install(s) => f(s),
            State::Finish(s) => f(s),
            State::Error(s) => f(s),
            State::Exit(s) => f(s),
        }
    }

    fn name(&self) -> &'static str {
        self.for_any_state(|s| s.name())
    }

    fn is_preemptive_state(&self) -> bool {
        self.for_any_state(|s| s.is_preemptive_state())
    }

    fn package_uid(&self) -> Option<String> {
        self.for_any_state(|s| s.package_uid())
    }

    fn error_message(&self) -> Option<String> {
        self.for_any_state(|s| s.error_message())
    }
}

/// The update agent, ready to be driven to completion.
///
/// It supports following states, and transitions, as shown in the
/// below diagram:
///
/// ```text
///   .-------------------------------------------------------------.
///   v                                                             |
/// Idle -> Poll -> CheckUpdate -> Download -> Install -> Finish -> Exit
///   ^      '          '              '           '
///   |      '          '              v           v
///   `------'----------'------------- Error <-----'
/// ```
pub struct Agent {
    machine: machine::StateMachine,
}

impl Agent {
    /// Loads the runtime settings and the firmware metadata and
    /// prepares the state machine talking to the configured server.
    pub fn new(settings: Settings) -> crate::Result<Self> {
        let mut runtime_settings = RuntimeSettings::load(&settings.storage.runtime_settings)?;
        if !settings.storage.read_only {
            runtime_settings.enable_persistency();
        }
        let firmware = Metadata::from_path(&settings.firmware.metadata)?;
        let api = CloudApi::new(&settings.network.server_address);

        Ok(Self::with_api(settings, runtime_settings, firmware, Box::new(api)))
    }

    pub(crate) fn with_api(
        settings: Settings,
        runtime_settings: RuntimeSettings,
        firmware: Metadata,
        api: Box<dyn Api>,
    ) -> Self {
        let mut registry = Registry::default();
        registry.retain_modes(&settings.update.supported_install_modes);
        let context = Context::new(settings, runtime_settings, firmware, api, registry);

        Agent { machine: machine::StateMachine::new(State::Idle(Idle {}), context) }
    }

    pub fn handle(&self) -> Handle {
        self.machine.handle()
    }

    /// Runs the state machine up to an exit state or a stop request,
    /// returning the exit code.
    pub async fn run(self) -> i32 {
        self.machine.start().await
    }
}
