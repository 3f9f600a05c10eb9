use std::io::{Cursor, Read};

use bytes::Bytes;
use thiserror::Error;
use zip::ZipArchive;

use crate::config::Settings;
use crate::report::Reporter;
use crate::store::ObjectStore;

/// Fixed suffix appended to the archive name to form the destination folder
const EXTRACTED_SUFFIX: &str = ".zip_extracted";

/// Failures the pipeline can hit. Either one aborts the remaining entries
/// and propagates to the invocation boundary; there is no local recovery.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input is not a valid ZIP stream
    #[error("invalid ZIP archive")]
    Decode(#[from] zip::result::ZipError),
    /// An entry's content could not be read out of the archive
    #[error("failed to read archive entry {name}")]
    EntryRead {
        name: String,
        #[source]
        source: std::io::Error,
    },
    /// The destination store rejected a write
    #[error("failed to upload {key}: {cause:#}")]
    Storage { key: String, cause: anyhow::Error },
}

/// Destination folder for an archive name (logical name, no `.zip` extension).
pub fn destination_folder(output_prefix: &str, archive_name: &str) -> String {
    format!("{output_prefix}/{archive_name}{EXTRACTED_SUFFIX}")
}

/// Extract every entry of `archive` and upload the non-empty ones.
///
/// Entries are processed strictly in the archive's native directory order;
/// zero-length entries (directory markers, empty files) are trace-logged and
/// skipped. The first failure aborts the rest. Uploads overwrite whatever is
/// already at the destination key, so duplicate entry paths are
/// last-write-wins.
pub async fn extract_and_upload(
    store: &dyn ObjectStore,
    settings: &Settings,
    reporter: &mut Reporter,
    archive: Bytes,
    archive_name: &str,
) -> Result<(), ExtractError> {
    reporter.info(format!("Output bucket: {}", settings.output_bucket));

    let folder = destination_folder(&settings.output_prefix, archive_name);
    reporter.info(format!("Output folder: {folder}"));

    reporter.info(format!(
        "Processing archive: {}.zip ({} bytes)",
        archive_name,
        archive.len()
    ));

    let mut zip = ZipArchive::new(Cursor::new(archive.as_ref()))?;
    reporter.info(format!("Total entries in archive: {}", zip.len()));

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let name = entry.name().to_string();
        reporter.trace(format!("Processing: {name}"));

        if entry.size() == 0 {
            continue;
        }

        let key = format!("{folder}/{name}");
        reporter.trace(format!("Uploading: {key}"));

        let mut contents = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut contents)
            .map_err(|source| ExtractError::EntryRead { name, source })?;

        store
            .put_object(&settings.output_bucket, &key, Bytes::from(contents))
            .await
            .map_err(|cause| ExtractError::Storage { key, cause })?;
    }

    reporter.info(format!("Done processing archive: {archive_name}.zip"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::Mutex;

    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use zip::write::SimpleFileOptions;

    use super::*;

    /// In-memory object store keyed by `bucket/key`
    #[derive(Default)]
    struct MemoryStore {
        objects: Mutex<HashMap<String, Bytes>>,
    }

    impl MemoryStore {
        fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
            self.objects
                .lock()
                .unwrap()
                .get(&format!("{bucket}/{key}"))
                .cloned()
        }

        fn len(&self) -> usize {
            self.objects.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<()> {
            self.objects
                .lock()
                .unwrap()
                .insert(format!("{bucket}/{key}"), body);
            Ok(())
        }

        async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
            self.object(bucket, key)
                .ok_or_else(|| anyhow!("No such object: {bucket}/{key}"))
        }
    }

    /// Store that rejects every write
    struct RejectingStore;

    #[async_trait]
    impl ObjectStore for RejectingStore {
        async fn put_object(&self, _bucket: &str, _key: &str, _body: Bytes) -> Result<()> {
            Err(anyhow!("access denied"))
        }

        async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
            Err(anyhow!("No such object: {bucket}/{key}"))
        }
    }

    fn build_zip(entries: &[(&str, &[u8])]) -> Bytes {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options = SimpleFileOptions::default();
            for (name, data) in entries {
                writer.start_file(*name, options).unwrap();
                writer.write_all(data).unwrap();
            }
            writer.finish().unwrap();
        }
        Bytes::from(cursor.into_inner())
    }

    fn settings() -> Settings {
        Settings {
            output_bucket: "dest".to_string(),
            output_prefix: "out".to_string(),
            email_to: None,
            email_from: None,
            sendgrid_api_key: None,
            mail_best_effort: false,
        }
    }

    #[test]
    fn destination_folder_uses_fixed_suffix() {
        assert_eq!(destination_folder("out", "report"), "out/report.zip_extracted");
    }

    #[tokio::test]
    async fn uploads_nonempty_entries_and_skips_empty_ones() {
        let archive = build_zip(&[
            ("a.txt", b"hello"),
            ("sub/b.txt", b""),
            ("sub/c.txt", b"abc"),
        ]);
        let store = MemoryStore::default();
        let mut reporter = Reporter::new();

        extract_and_upload(&store, &settings(), &mut reporter, archive, "report")
            .await
            .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(
            store.object("dest", "out/report.zip_extracted/a.txt").unwrap(),
            Bytes::from_static(b"hello")
        );
        assert_eq!(
            store
                .object("dest", "out/report.zip_extracted/sub/c.txt")
                .unwrap(),
            Bytes::from_static(b"abc")
        );
        assert!(store.object("dest", "out/report.zip_extracted/sub/b.txt").is_none());
    }

    #[tokio::test]
    async fn report_contains_entry_count_and_done_line() {
        let archive = build_zip(&[("a.txt", b"x"), ("b.txt", b"y")]);
        let store = MemoryStore::default();
        let mut reporter = Reporter::new();

        extract_and_upload(&store, &settings(), &mut reporter, archive, "logs")
            .await
            .unwrap();

        let lines = reporter.into_lines();
        assert!(lines.contains(&"Total entries in archive: 2".to_string()));
        assert_eq!(lines.last().unwrap(), "Done processing archive: logs.zip");
        // Per-entry paths are trace-only and never reach the report
        assert!(lines.iter().all(|l| !l.contains("Uploading:")));
    }

    #[tokio::test]
    async fn directory_markers_are_skipped() {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options = SimpleFileOptions::default();
            writer.add_directory("nested/", options).unwrap();
            writer.start_file("nested/file.bin", options).unwrap();
            writer.write_all(&[0u8, 1, 2, 3]).unwrap();
            writer.finish().unwrap();
        }
        let archive = Bytes::from(cursor.into_inner());

        let store = MemoryStore::default();
        let mut reporter = Reporter::new();
        extract_and_upload(&store, &settings(), &mut reporter, archive, "pack")
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store
                .object("dest", "out/pack.zip_extracted/nested/file.bin")
                .unwrap(),
            Bytes::from_static(&[0, 1, 2, 3])
        );
    }

    #[tokio::test]
    async fn malformed_input_is_a_decode_failure() {
        let store = MemoryStore::default();
        let mut reporter = Reporter::new();

        let err = extract_and_upload(
            &store,
            &settings(),
            &mut reporter,
            Bytes::from_static(b"this is not a zip"),
            "broken",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ExtractError::Decode(_)));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn rejected_write_is_a_storage_failure() {
        let archive = build_zip(&[("a.txt", b"hello")]);
        let mut reporter = Reporter::new();

        let err = extract_and_upload(&RejectingStore, &settings(), &mut reporter, archive, "report")
            .await
            .unwrap_err();

        match err {
            ExtractError::Storage { key, .. } => {
                assert_eq!(key, "out/report.zip_extracted/a.txt");
            }
            other => panic!("expected storage failure, got {other:?}"),
        }
        // The failure aborts before the final informational line
        assert!(!reporter
            .lines()
            .iter()
            .any(|l| l.starts_with("Done processing")));
    }
}
