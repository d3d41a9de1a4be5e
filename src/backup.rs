use anyhow::{anyhow, Context};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::model::{Attendance, Course, Marks, Query, User};
use crate::store::{
    now_timestamp, Collection, KvBackend, RecordStore, ALL_KEYS, ATTENDANCE_KEY, COURSES_KEY,
    CURRENT_USER_KEY, MARKS_KEY, QUERIES_KEY, USERS_KEY,
};

const MANIFEST_ENTRY: &str = "manifest.json";
pub const BUNDLE_FORMAT_V1: &str = "collegerec-workspace-v1";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub entry_count: usize,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub bundle_format_detected: String,
    pub keys_restored: usize,
}

fn data_entry(key: &str) -> String {
    format!("data/{}.json", key)
}

fn check_records<T: Collection>(raw: &str) -> anyhow::Result<()> {
    serde_json::from_str::<Vec<T>>(raw)
        .map(drop)
        .with_context(|| format!("{} does not hold valid records", data_entry(T::KEY)))
}

/// Bundle entries must decode as the records their key holds.
fn check_entry(key: &str, raw: &str) -> anyhow::Result<()> {
    match key {
        USERS_KEY => check_records::<User>(raw),
        COURSES_KEY => check_records::<Course>(raw),
        MARKS_KEY => check_records::<Marks>(raw),
        ATTENDANCE_KEY => check_records::<Attendance>(raw),
        QUERIES_KEY => check_records::<Query>(raw),
        CURRENT_USER_KEY => Ok(()),
        other => Err(anyhow!("unexpected bundle key {}", other)),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Write every stored key into a zip bundle with a checksummed manifest.
pub fn export_workspace_bundle<B: KvBackend>(
    store: &RecordStore<B>,
    out_path: &Path,
) -> anyhow::Result<ExportSummary> {
    let mut blobs: BTreeMap<&str, String> = BTreeMap::new();
    for key in ALL_KEYS {
        if let Some(raw) = store
            .read_raw(key)
            .with_context(|| format!("failed to read {}", key))?
        {
            blobs.insert(key, raw);
        }
    }

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }

    let out_file = File::create(out_path).with_context(|| {
        format!(
            "failed to create output file {}",
            out_path.to_string_lossy()
        )
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let exported_at = now_timestamp();
    let checksums: BTreeMap<&str, String> = blobs
        .iter()
        .map(|(k, v)| (*k, sha256_hex(v.as_bytes())))
        .collect();
    let manifest = json!({
        "format": BUNDLE_FORMAT_V1,
        "version": 1,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": exported_at,
        "sha256": checksums,
    });
    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    for (key, raw) in &blobs {
        zip.start_file(data_entry(key), opts)
            .with_context(|| format!("failed to start entry for {}", key))?;
        zip.write_all(raw.as_bytes())
            .with_context(|| format!("failed to write entry for {}", key))?;
    }

    zip.finish().context("failed to finalize zip bundle")?;
    tracing::info!(
        path = %out_path.to_string_lossy(),
        keys = blobs.len(),
        "workspace bundle exported"
    );

    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT_V1.to_string(),
        entry_count: 1 + blobs.len(),
    })
}

/// Replace the store's contents with a bundle's. Every entry is read and
/// checked before anything is written; keys missing from the bundle are
/// cleared.
pub fn import_workspace_bundle<B: KvBackend>(
    store: &mut RecordStore<B>,
    in_path: &Path,
) -> anyhow::Result<ImportSummary> {
    let in_file = File::open(in_path)
        .with_context(|| format!("failed to open bundle {}", in_path.to_string_lossy()))?;
    let mut archive = ZipArchive::new(in_file).context("invalid zip archive")?;

    let mut manifest_text = String::new();
    archive
        .by_name(MANIFEST_ENTRY)
        .context("bundle missing manifest.json")?
        .read_to_string(&mut manifest_text)
        .context("failed to read manifest.json")?;
    let manifest: serde_json::Value =
        serde_json::from_str(&manifest_text).context("manifest.json is invalid JSON")?;
    let format = manifest
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if format != BUNDLE_FORMAT_V1 {
        return Err(anyhow!("unsupported bundle format: {}", format));
    }
    let checksums = manifest
        .get("sha256")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let mut restored: Vec<(&str, Option<String>)> = Vec::with_capacity(ALL_KEYS.len());
    for key in ALL_KEYS {
        let Some(expected) = checksums.get(key).and_then(|v| v.as_str()) else {
            restored.push((key, None));
            continue;
        };
        let mut raw = String::new();
        archive
            .by_name(&data_entry(key))
            .with_context(|| format!("bundle missing {}", data_entry(key)))?
            .read_to_string(&mut raw)
            .with_context(|| format!("failed to read {}", data_entry(key)))?;
        let actual = sha256_hex(raw.as_bytes());
        if actual != expected {
            return Err(anyhow!(
                "checksum mismatch for {}: expected {}, got {}",
                key,
                expected,
                actual
            ));
        }
        check_entry(key, &raw)?;
        restored.push((key, Some(raw)));
    }

    let entries: Vec<(&str, Option<&str>)> = restored
        .iter()
        .map(|(key, raw)| (*key, raw.as_deref()))
        .collect();
    store
        .write_raw_all(&entries)
        .context("failed to write imported keys")?;
    let keys_restored = entries.iter().filter(|(_, raw)| raw.is_some()).count();
    tracing::info!(
        path = %in_path.to_string_lossy(),
        keys = keys_restored,
        "workspace bundle imported"
    );

    Ok(ImportSummary {
        bundle_format_detected: BUNDLE_FORMAT_V1.to_string(),
        keys_restored,
    })
}
