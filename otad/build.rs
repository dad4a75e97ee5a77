// Copyright (C) 2018 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use git_version::git_version;

fn main() {
    println!("cargo:rustc-env=VERSION={}", git_version!(fallback = env!("CARGO_PKG_VERSION")));

    // Hook based tests change the process PATH.
    println!("cargo:rustc-env=RUST_TEST_THREADS=1");
}
