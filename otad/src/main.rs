// Copyright (C) 2017, 2018 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use argh::FromArgs;
use slog_scope::{info, warn};
use std::path::PathBuf;

#[derive(FromArgs)]
/// A Firmware Over-The-Air agent.
struct TopLevel {
    /// increase the verboseness level
    #[argh(switch, short = 'v')]
    verbose: u8,

    /// configuration file to use (defaults to /etc/otad.conf)
    #[argh(option, short = 'c', default = "PathBuf::from(\"/etc/otad.conf\")")]
    config: PathBuf,

    /// print the version and exit
    #[argh(switch)]
    version: bool,
}

async fn run(cmd: TopLevel) -> otad::Result<i32> {
    let _guard = otad::logger::init(otad::logger::level_from_verbosity(cmd.verbose.into()));
    info!("starting otad agent {}", otad::version());

    let settings = otad::Settings::load(&cmd.config)?;
    let agent = otad::Agent::new(settings)?;

    let handle = agent.handle();
    match async_ctrlc::CtrlC::new() {
        Ok(ctrlc) => {
            tokio::spawn(async move {
                ctrlc.await;
                info!("interrupt received, stopping the agent");
                handle.stop();
            });
        }
        Err(e) => warn!("unable to watch for Ctrl-C: {}", e),
    }

    Ok(agent.run().await)
}

#[tokio::main]
async fn main() {
    let cmd: TopLevel = argh::from_env();

    if cmd.version {
        println!("{}", otad::version());
        return;
    }

    match run(cmd).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
