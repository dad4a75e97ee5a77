// Copyright (C) 2021 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

logging_content::trait_LogContent!(slog_scope);
logging_content::trait_LogDisplay!();
logging_content::impl_Result_no_ok!();

impl<E: Error> LogDisplay for E {
    fn as_log_display(&self, _: logging_content::Level) -> String {
        error_chain(self)
    }
}

/// Joins the error with all of its sources, outermost first.
fn error_chain(err: &dyn Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        let cause = e.to_string();
        if !msg.ends_with(&cause) {
            msg.push_str(": ");
            msg.push_str(&cause);
        }
        source = e.source();
    }

    msg
}
