//! PHPP annotation payloads on host model objects.
//!
//! Host model objects carry a free-form user-data tree; everything this
//! plugin writes lives under one `"phpp"` key so other tools' data is never
//! disturbed. Payloads are plain JSON values built from the wire records.

use crate::spaces::records::{composite_key, SpaceRecord};
use crate::spaces::Space;
use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};

pub const ANNOTATION_ROOT: &str = "phpp";
pub const SPACES_KEY: &str = "spaces";

/// How to write when the key already holds data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Merge mapping payloads key-by-key into the existing entry.
    Update,
    /// Replace the entry wholesale.
    Overwrite,
}

/// Writes a payload under `phpp.<key>` in the given user-data tree.
///
/// A null tree is promoted to an empty mapping; sibling keys (both other
/// tools' data and other phpp entries) are left alone.
pub fn write_annotation(
    user_data: &mut Value,
    key: &str,
    payload: Value,
    mode: WriteMode,
) -> Result<()> {
    if user_data.is_null() {
        *user_data = Value::Object(Map::new());
    }
    let root = user_data
        .as_object_mut()
        .ok_or_else(|| anyhow!("user data is not a mapping"))?;
    let phpp = root
        .entry(ANNOTATION_ROOT)
        .or_insert_with(|| Value::Object(Map::new()));
    let phpp = phpp
        .as_object_mut()
        .ok_or_else(|| anyhow!("'{}' entry is not a mapping", ANNOTATION_ROOT))?;

    let merge = mode == WriteMode::Update && matches!(phpp.get(key), Some(Value::Object(_)));
    match (merge, payload) {
        (true, Value::Object(new_entries)) => {
            if let Some(Value::Object(existing)) = phpp.get_mut(key) {
                existing.extend(new_entries);
            }
        }
        (_, payload) => {
            phpp.insert(key.to_string(), payload);
        }
    }
    Ok(())
}

/// Reads the payload under `phpp.<key>`, if any.
pub fn read_annotation<'a>(user_data: &'a Value, key: &str) -> Option<&'a Value> {
    user_data.get(ANNOTATION_ROOT)?.get(key)
}

/// Writes the spaces of one room into its user-data tree.
pub fn write_spaces(user_data: &mut Value, spaces: &[Space], mode: WriteMode) -> Result<()> {
    let mut payload = Map::new();
    for space in spaces {
        let key = composite_key(&space.dict_key(), space.id());
        payload.insert(key, serde_json::to_value(space.to_record())?);
    }
    write_annotation(user_data, SPACES_KEY, Value::Object(payload), mode)
}

/// Reconstructs the spaces stored in one room's user-data tree.
///
/// A tree without a spaces annotation yields an empty list.
pub fn spaces_from_annotation(user_data: &Value) -> Result<Vec<Space>> {
    let Some(stored) = read_annotation(user_data, SPACES_KEY) else {
        return Ok(Vec::new());
    };
    let entries = stored
        .as_object()
        .ok_or_else(|| anyhow!("'{}' annotation is not a mapping", SPACES_KEY))?;

    let mut spaces = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let record: SpaceRecord = serde_json::from_value(value.clone())
            .with_context(|| format!("bad space record at '{}'", key))?;
        spaces.push(Space::from_record(record)?);
    }
    Ok(spaces)
}

/// Total treated floor area over all annotated rooms of a model.
pub fn model_tfa<'a>(room_user_data: impl IntoIterator<Item = &'a Value>) -> Result<f64> {
    let mut total = 0.0;
    for user_data in room_user_data {
        for space in spaces_from_annotation(user_data)? {
            total += space.area_tfa();
        }
    }
    Ok(total)
}
