// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

mod chunk_size;
mod compressed_sizes;
mod count;
mod filesystem;
mod skip;
mod target;
pub mod target_permissions;
mod truncate;

pub use chunk_size::{ChunkSize, MAX_CHUNK_SIZE};
pub use compressed_sizes::CompressedSizes;
pub use count::Count;
pub use filesystem::Filesystem;
pub use skip::Skip;
pub use target::Target;
pub use target_permissions::TargetPermissions;
pub use truncate::Truncate;
