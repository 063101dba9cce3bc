//! Board schema versions and the transforms between them.
//!
//! Migrations run on the raw YAML document before it is deserialized into a
//! [`Board`], one version step at a time, so that every historical layout
//! only needs a single transform to its successor.
//!
//! - **0.1**: `name`, `description` and `columns` live under `configuration:`;
//!   board timestamps are `metadata.createdAt` / `metadata.lastModified`.
//! - **0.2**: board fields at the top level, timestamps under `dates:`.

use crate::board::Board;
use crate::error::{KnbnError, Result};
use chrono::Utc;
use serde_yaml::{Mapping, Value};

pub const CURRENT_VERSION: &str = "0.2";
pub const LEGACY_VERSION: &str = "0.1";

/// An unparsed board document of any schema version.
pub type Document = Value;

/// Parse raw board-file text. The top level must be a mapping.
pub fn parse_document(raw: &str) -> Result<Value> {
    let doc: Value = serde_yaml::from_str(raw)?;
    if !doc.is_mapping() {
        return Err(KnbnError::InvalidFormat(
            "expected a mapping at the top level".to_string(),
        ));
    }
    Ok(doc)
}

/// The schema version a document declares in `metadata.version`.
pub fn document_version(doc: &Value) -> Option<String> {
    match doc.get("metadata")?.get("version")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Upgrade a parsed document to [`CURRENT_VERSION`] and deserialize it.
pub fn migrate_board(mut doc: Value) -> Result<Board> {
    loop {
        let version = document_version(&doc)
            .ok_or_else(|| KnbnError::InvalidFormat("missing metadata.version".to_string()))?;
        match version.as_str() {
            CURRENT_VERSION => break,
            LEGACY_VERSION => {
                tracing::debug!(from = LEGACY_VERSION, to = CURRENT_VERSION, "migrating board");
                doc = migrate_v0_1_to_v0_2(doc)?;
            }
            other => return Err(KnbnError::UnsupportedVersion(other.to_string())),
        }
    }

    normalize_collections(&mut doc);
    serde_yaml::from_value(doc).map_err(|e| KnbnError::InvalidFormat(e.to_string()))
}

fn migrate_v0_1_to_v0_2(doc: Value) -> Result<Value> {
    let Value::Mapping(mut root) = doc else {
        return Err(KnbnError::InvalidFormat(
            "expected a mapping at the top level".to_string(),
        ));
    };

    let Some(Value::Mapping(config)) = root.remove("configuration") else {
        return Err(KnbnError::InvalidFormat(
            "0.1 board is missing its configuration block".to_string(),
        ));
    };
    for (key, value) in config {
        root.entry(key).or_insert(value);
    }

    let mut metadata = match root.remove("metadata") {
        Some(Value::Mapping(m)) => m,
        _ => Mapping::new(),
    };
    let now = Value::String(Utc::now().to_rfc3339());
    let created = metadata.remove("createdAt").unwrap_or_else(|| now.clone());
    let updated = metadata.remove("lastModified").unwrap_or_else(|| created.clone());
    if !metadata.contains_key("nextId") {
        metadata.insert("nextId".into(), Value::from(next_free_id(&root)));
    }
    metadata.insert("version".into(), CURRENT_VERSION.into());
    root.insert("metadata".into(), Value::Mapping(metadata));

    let mut dates = Mapping::new();
    dates.insert("created".into(), created);
    dates.insert("updated".into(), updated.clone());
    dates.insert("saved".into(), updated);
    root.insert("dates".into(), Value::Mapping(dates));

    Ok(Value::Mapping(root))
}

fn next_free_id(root: &Mapping) -> u64 {
    let Some(Value::Mapping(tasks)) = root.get("tasks") else {
        return 1;
    };
    tasks
        .keys()
        .filter_map(|k| match k {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .max()
        .map_or(1, |max| max + 1)
}

/// Drop explicit nulls for the optional collections, turn quoted task IDs
/// (`'1':`) into integer keys, and store an unquoted `version: 0.2` as text.
fn normalize_collections(doc: &mut Value) {
    let Value::Mapping(root) = doc else {
        return;
    };
    if let Some(Value::Mapping(metadata)) = root.get_mut("metadata") {
        if let Some(Value::Number(n)) = metadata.get("version") {
            let version = Value::String(n.to_string());
            metadata.insert("version".into(), version);
        }
    }
    for key in ["tasks", "labels", "sprints"] {
        if root.get(key).is_some_and(Value::is_null) {
            root.remove(key);
        }
    }
    if let Some(Value::Mapping(tasks)) = root.get_mut("tasks") {
        let entries = std::mem::take(tasks);
        for (key, value) in entries {
            let key = match key {
                Value::String(s) => match s.trim().parse::<u64>() {
                    Ok(id) => Value::from(id),
                    Err(_) => Value::String(s),
                },
                other => other,
            };
            tasks.insert(key, value);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
