// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use slog::{o, Drain, Level, Logger};
use slog_scope::GlobalLoggerGuard;
use std::sync::Mutex;

/// Maps the number of `-v` flags into a log level, starting at `Info`.
pub fn level_from_verbosity(verbosity: usize) -> Level {
    match verbosity {
        0 => Level::Info,
        1 => Level::Debug,
        _ => Level::Trace,
    }
}

/// Installs the global terminal logger. Logging stops once the
/// returned guard is dropped.
#[must_use]
pub fn init(level: Level) -> GlobalLoggerGuard {
    let terminal_drain = Mutex::new(slog_term::term_full().filter_level(level)).fuse();
    let terminal_drain = slog_async::Async::new(terminal_drain).build().fuse();

    slog_scope::set_global_logger(Logger::root(terminal_drain, o!()))
}
