// Copyright (C) 2017, 2018 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::{MetadataValue, Result};
use slog_scope::error;
use std::{io, path::Path};
use walkdir::WalkDir;

pub(crate) fn run_hook(path: &Path) -> Result<String> {
    if !path.exists() {
        return Ok("".into());
    }

    run_script(&path.to_string_lossy())
}

/// Runs every executable found directly below `path`, in file name
/// order, merging their outputs.
pub(crate) fn run_hooks_from_dir(path: &Path) -> Result<MetadataValue> {
    let mut outputs = Vec::new();
    for entry in WalkDir::new(path).follow_links(true).sort_by_file_name().min_depth(1).max_depth(1)
    {
        let output = run_hook(entry?.path())?;
        if !output.is_empty() {
            outputs.push(output);
        }
    }

    Ok(metadata_value_from_str(&outputs.join("\n"))?)
}

pub(crate) fn run_script(cmd: &str) -> Result<String> {
    let output = easy_process::run(cmd)?;
    if !output.stderr.is_empty() {
        output.stderr.lines().for_each(|err| error!("{} (stderr): {}", cmd, err))
    }

    Ok(output.stdout.trim().into())
}

/// Parses `<key>=<value>` lines. Repeated keys accumulate their
/// values, kept sorted.
fn metadata_value_from_str(s: &str) -> io::Result<MetadataValue> {
    let mut mv = MetadataValue::default();
    for line in s.lines() {
        let (key, value) = line.split_once('=').ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid hook output line {:?}, expected <key>=<value>", line),
            )
        })?;
        mv.entry(key.trim().to_owned()).or_default().push(value.trim().to_owned());
    }
    mv.values_mut().for_each(|values| values.sort());

    Ok(mv)
}
