// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use super::{ensure_device_target, Installer, Result};
use crate::utils::io::ChunkWriter;
use pkg_schema::{objects, ObjectMetadata};
use slog_scope::{debug, info};
use std::{
    fs,
    io::{self, BufReader, Read, Seek, SeekFrom},
    path::Path,
};

impl Installer for objects::Raw {
    fn metadata(&self) -> &ObjectMetadata {
        &self.metadata
    }

    fn setup(&mut self) -> Result<()> {
        info!("'raw' handler setup");
        ensure_device_target("raw", &self.target)
    }

    fn install(&mut self, download_dir: &Path) -> Result<()> {
        info!("'raw' handler install {} on {:?}", self.metadata.sha256sum, self.target.target);

        let source = download_dir.join(&self.metadata.sha256sum);
        let chunk_size = self.chunk_size.0;
        let skip = self.skip.0.saturating_mul(chunk_size as u64);

        // Block devices are never truncated on open; regular files may
        // get truncated once the final length is known. A missing node
        // under /dev is an error, never a new plain file.
        let mut output = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(!self.target.target.starts_with("/dev"))
            .truncate(false)
            .open(&self.target.target)?;
        output.seek(SeekFrom::Start(self.seek))?;

        let (output, written) = if self.metadata.compressed {
            let mut writer = ChunkWriter::new(output, chunk_size, self.count).skip(skip);
            compress_tools::uncompress_data(fs::File::open(&source)?, &mut writer)?;
            writer.finish()?
        } else {
            let mut input = BufReader::with_capacity(chunk_size, fs::File::open(&source)?);
            input.seek(SeekFrom::Start(skip))?;

            let mut writer = ChunkWriter::new(output, chunk_size, self.count);
            match self.count.bytes(chunk_size) {
                Some(limit) => io::copy(&mut input.take(limit), &mut writer)?,
                None => io::copy(&mut input, &mut writer)?,
            };
            writer.finish()?
        };
        debug!("{} bytes written to {:?}", written, self.target.target);

        if self.truncate.0 && output.metadata()?.is_file() {
            output.set_len(self.seek + written)?;
        }
        output.sync_all()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{installer, Error};
    use flate2::{write::GzEncoder, Compression};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;
    use tempfile::{tempdir, TempDir};

    const SHA256SUM: &str = "cfe2be1c64b0387500853de0f48303e3de7b1c6f1508dc719eeafa0d41c36722";
    const DEFAULT_BYTE: u8 = 0xF;

    struct Fixture {
        download_dir: TempDir,
        source: Vec<u8>,
        target: tempfile::NamedTempFile,
    }

    impl Fixture {
        fn new(source_size: usize, target_size: usize) -> Self {
            let download_dir = tempdir().unwrap();
            let source = (0..source_size).map(|i| (i % 251) as u8).collect::<Vec<_>>();
            fs::write(download_dir.path().join(SHA256SUM), &source).unwrap();

            let mut target = tempfile::NamedTempFile::new().unwrap();
            target.write_all(&vec![DEFAULT_BYTE; target_size]).unwrap();

            Fixture { download_dir, source, target }
        }

        fn compress_source(&self) {
            let mut e = GzEncoder::new(Vec::new(), Compression::default());
            e.write_all(&self.source).unwrap();
            fs::write(self.download_dir.path().join(SHA256SUM), e.finish().unwrap()).unwrap();
        }

        fn object(&self, extra: serde_json::Value) -> objects::Raw {
            let mut document = json!({
                "mode": "raw",
                "sha256sum": SHA256SUM,
                "size": self.source.len(),
                "target-type": "device",
                "target": self.target.path(),
                "chunk-size": 128,
                "truncate": false
            });
            if let (Some(doc), Some(extra)) = (document.as_object_mut(), extra.as_object()) {
                doc.extend(extra.clone());
            }

            serde_json::from_value(document).unwrap()
        }

        fn install(&self, extra: serde_json::Value) -> Vec<u8> {
            let mut obj = self.object(extra);
            installer::run(&mut obj, self.download_dir.path()).unwrap();
            fs::read(self.target.path()).unwrap()
        }
    }

    #[test]
    fn setup_accepts_device() {
        let fixture = Fixture::new(0, 0);
        fixture.object(json!({})).setup().unwrap();
    }

    #[test]
    fn setup_rejects_other_target_types() {
        let fixture = Fixture::new(0, 0);

        for target_type in &["mtdname", "ubivolume", "anything-else"] {
            let mut obj = fixture.object(json!({ "target-type": target_type }));
            let err = obj.setup().unwrap_err();

            assert!(matches!(err, Error::UnsupportedTargetType { .. }));
            assert_eq!(
                err.to_string(),
                format!(
                    "target-type '{}' is not supported for the 'raw' handler. Its value must be 'device'",
                    target_type
                )
            );
        }
    }

    #[test]
    fn defaults() {
        let fixture = Fixture::new(0, 0);
        let obj: objects::Raw = serde_json::from_value(json!({
            "mode": "raw",
            "sha256sum": SHA256SUM,
            "size": 0,
            "target-type": "device",
            "target": fixture.target.path(),
        }))
        .unwrap();

        assert_eq!(obj.chunk_size.0, 128 * 1024);
        assert_eq!(obj.count, pkg_schema::definitions::Count::All);
        assert!(obj.truncate.0);
        assert_eq!(obj.skip.0, 0);
        assert_eq!(obj.seek, 0);
    }

    #[test]
    fn full_copy() {
        let fixture = Fixture::new(2048, 0);
        assert_eq!(fixture.install(json!({ "count": -1 })), fixture.source);
    }

    #[test]
    fn full_copy_of_uneven_source() {
        let fixture = Fixture::new(2000, 0);
        assert_eq!(fixture.install(json!({ "count": -1 })), fixture.source);
    }

    #[test]
    fn limited_count() {
        let fixture = Fixture::new(2048, 2048);
        let target = fixture.install(json!({ "count": 8 }));

        assert_eq!(&target[..1024], &fixture.source[..1024]);
        assert_eq!(&target[1024..], vec![DEFAULT_BYTE; 1024].as_slice());
    }

    #[test]
    fn count_with_partial_last_chunk() {
        let fixture = Fixture::new(1000, 0);
        let target = fixture.install(json!({ "count": 8 }));

        // 7 full chunks plus a 104 bytes one.
        assert_eq!(target, fixture.source);
    }

    #[test]
    fn skip_chunks() {
        let fixture = Fixture::new(2048, 2048);
        let target = fixture.install(json!({ "skip": 8 }));

        assert_eq!(&target[..1024], &fixture.source[1024..]);
        assert_eq!(&target[1024..], vec![DEFAULT_BYTE; 1024].as_slice());
    }

    #[test]
    fn seek_bytes() {
        let fixture = Fixture::new(1024, 2048);
        let target = fixture.install(json!({ "seek": 1000 }));

        assert_eq!(&target[..1000], vec![DEFAULT_BYTE; 1000].as_slice());
        assert_eq!(&target[1000..2024], fixture.source.as_slice());
        assert_eq!(&target[2024..], vec![DEFAULT_BYTE; 24].as_slice());
    }

    #[test]
    fn truncate() {
        let fixture = Fixture::new(1024, 4096);
        let target = fixture.install(json!({ "truncate": true }));
        assert_eq!(target, fixture.source);

        let fixture = Fixture::new(1024, 4096);
        let target = fixture.install(json!({ "truncate": true, "seek": 512 }));
        assert_eq!(target.len(), 512 + 1024);
        assert_eq!(&target[512..], fixture.source.as_slice());
    }

    #[test]
    fn keep_trailing_bytes_without_truncate() {
        let fixture = Fixture::new(1024, 4096);
        let target = fixture.install(json!({ "truncate": false }));

        assert_eq!(target.len(), 4096);
        assert_eq!(&target[..1024], fixture.source.as_slice());
        assert_eq!(&target[1024..], vec![DEFAULT_BYTE; 3072].as_slice());
    }

    #[test]
    fn create_missing_target_file() {
        let fixture = Fixture::new(1024, 0);
        let dir = tempdir().unwrap();
        let target = dir.path().join("image");

        let mut obj = fixture.object(json!({ "target": target }));
        installer::run(&mut obj, fixture.download_dir.path()).unwrap();
        assert_eq!(fs::read(&target).unwrap(), fixture.source);
    }

    #[test]
    fn missing_device_node_is_not_created() {
        let fixture = Fixture::new(1024, 0);
        let target = Path::new("/dev/otad-missing-device-node");

        let mut obj = fixture.object(json!({ "target": target }));
        assert!(matches!(
            installer::run(&mut obj, fixture.download_dir.path()),
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::NotFound
        ));
        assert!(!target.exists());
    }

    #[test]
    fn compressed_source() {
        let fixture = Fixture::new(2048, 2048);
        fixture.compress_source();
        let target = fixture.install(json!({
            "compressed": true,
            "required-uncompressed-size": 2048,
            "skip": 2,
            "count": 4,
        }));

        assert_eq!(&target[..512], &fixture.source[256..768]);
        assert_eq!(&target[512..], vec![DEFAULT_BYTE; 1536].as_slice());
    }

    #[test]
    fn missing_source() {
        let fixture = Fixture::new(1024, 0);
        fs::remove_file(fixture.download_dir.path().join(SHA256SUM)).unwrap();

        let mut obj = fixture.object(json!({}));
        assert!(matches!(
            installer::run(&mut obj, fixture.download_dir.path()),
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::NotFound
        ));
    }
}
