//! WASM bindings for dotpath-core.
//!
//! Every export takes and returns JSON strings so the transforms can be called
//! from JavaScript/TypeScript without a shared object model. Built with
//! `wasm-bindgen-cli`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p dotpath-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/dotpath_wasm.wasm
//! ```

use dotpath_core::error::Result;
use dotpath_core::{Criteria, Levels, MatchType, RemovalAction, Sequence, Value};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn to_js(e: dotpath_core::DotPathError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Parse a collection argument; non-container JSON becomes an empty collection.
fn parse_collection(json: &str) -> Result<Sequence> {
    Ok(Value::from_json_str(json)?.into_sequence().unwrap_or_default())
}

fn parse_strings(json: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(json)?)
}

fn levels_from(levels: Option<i32>) -> Levels {
    levels.map_or(Levels::Unlimited, |n| Levels::from(i64::from(n)))
}

fn flatten_json(json: &str, delimiter: &str, levels: Option<i32>) -> Result<String> {
    let doc = Value::from_json_str(json)?;
    dotpath_core::flatten(&doc, delimiter, levels_from(levels)).to_json_string()
}

fn inflate_json(json: &str, delimiter: &str, levels: Option<i32>) -> Result<String> {
    let doc = Value::from_json_str(json)?;
    dotpath_core::inflate(&doc, delimiter, levels_from(levels)).to_json_string()
}

fn read_json(json: &str, path: &str, default_json: Option<&str>) -> Result<String> {
    let doc = Value::from_json_str(json)?;
    let default = default_json.map(Value::from_json_str).transpose()?;
    dotpath_core::read(&doc, path, default.as_ref()).to_json_string()
}

fn read_many_json(json: &str, paths_json: &str, default_json: Option<&str>) -> Result<String> {
    let doc = Value::from_json_str(json)?;
    let paths = parse_strings(paths_json)?;
    let default = default_json.map(Value::from_json_str).transpose()?;
    Value::Sequence(dotpath_core::read_many(&doc, &paths, default.as_ref())).to_json_string()
}

fn filter_json(
    json: &str,
    criteria_json: &str,
    match_type: &str,
    preserve_keys: bool,
    negate: bool,
) -> Result<String> {
    let match_type: MatchType = match_type.parse()?;
    let collection = parse_collection(json)?;
    let criteria = Criteria::from(Value::from_json_str(criteria_json)?);
    let selected = if negate {
        dotpath_core::filter_where_not(&collection, &criteria, match_type, preserve_keys)
    } else {
        dotpath_core::filter_where(&collection, &criteria, match_type, preserve_keys)
    };
    Value::Sequence(selected).to_json_string()
}

fn find_first_json(json: &str, criteria_json: &str, match_type: &str, negate: bool) -> Result<String> {
    let match_type: MatchType = match_type.parse()?;
    let collection = parse_collection(json)?;
    let criteria = Criteria::from(Value::from_json_str(criteria_json)?);
    let found = if negate {
        dotpath_core::find_first_where_not(&collection, &criteria, match_type)
    } else {
        dotpath_core::find_first_where(&collection, &criteria, match_type)
    };
    found.map_or(Value::NULL, |(_, value)| value.clone()).to_json_string()
}

fn key_by_json(json: &str, properties_json: &str, meta: bool) -> Result<String> {
    let collection = parse_collection(json)?;
    let properties = parse_strings(properties_json)?;
    if meta {
        Value::from(dotpath_core::key_by_property_with_meta(&collection, &properties)).to_json_string()
    } else {
        Value::Sequence(dotpath_core::key_by_property(&collection, &properties)).to_json_string()
    }
}

fn group_by_json(json: &str, properties_json: &str) -> Result<String> {
    let collection = parse_collection(json)?;
    let properties = parse_strings(properties_json)?;
    Value::Sequence(dotpath_core::group_by_property(&collection, &properties)).to_json_string()
}

fn project_json(json: &str, keys_json: &str, action: &str, keep: bool) -> Result<String> {
    let action: RemovalAction = action.parse()?;
    let keys = parse_strings(keys_json)?;
    let item = parse_collection(json)?;
    let projected = if keep {
        dotpath_core::keep_keys(&item, &keys, action)
    } else {
        dotpath_core::remove_keys(&item, &keys, action)
    };
    Value::Sequence(projected).to_json_string()
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Flatten nested JSON into delimiter-joined keys.
///
/// `levels` bounds the depth; omitted or negative means unlimited.
#[wasm_bindgen]
pub fn flatten(json: &str, delimiter: &str, levels: Option<i32>) -> std::result::Result<String, JsValue> {
    flatten_json(json, delimiter, levels).map_err(to_js)
}

/// Inflate delimiter-joined keys back into nested JSON.
#[wasm_bindgen]
pub fn inflate(json: &str, delimiter: &str, levels: Option<i32>) -> std::result::Result<String, JsValue> {
    inflate_json(json, delimiter, levels).map_err(to_js)
}

/// Read the value at a dot-path, or `default_json` (or `null`) if absent.
#[wasm_bindgen]
pub fn read(json: &str, path: &str, default_json: Option<String>) -> std::result::Result<String, JsValue> {
    read_json(json, path, default_json.as_deref()).map_err(to_js)
}

/// Read several dot-paths; `paths_json` is a JSON array of strings.
#[wasm_bindgen(js_name = "readMany")]
pub fn read_many(
    json: &str,
    paths_json: &str,
    default_json: Option<String>,
) -> std::result::Result<String, JsValue> {
    read_many_json(json, paths_json, default_json.as_deref()).map_err(to_js)
}

/// Entries of a collection matching the criteria.
///
/// `match_type` is one of `loose`, `strict`, `ci`.
#[wasm_bindgen(js_name = "filterWhere")]
pub fn filter_where(
    json: &str,
    criteria_json: &str,
    match_type: &str,
    preserve_keys: bool,
) -> std::result::Result<String, JsValue> {
    filter_json(json, criteria_json, match_type, preserve_keys, false).map_err(to_js)
}

/// Entries of a collection not matching the criteria.
#[wasm_bindgen(js_name = "filterWhereNot")]
pub fn filter_where_not(
    json: &str,
    criteria_json: &str,
    match_type: &str,
    preserve_keys: bool,
) -> std::result::Result<String, JsValue> {
    filter_json(json, criteria_json, match_type, preserve_keys, true).map_err(to_js)
}

/// The first matching entry, or `null`.
#[wasm_bindgen(js_name = "findFirstWhere")]
pub fn find_first_where(
    json: &str,
    criteria_json: &str,
    match_type: &str,
) -> std::result::Result<String, JsValue> {
    find_first_json(json, criteria_json, match_type, false).map_err(to_js)
}

/// The first non-matching entry, or `null`.
#[wasm_bindgen(js_name = "findFirstWhereNot")]
pub fn find_first_where_not(
    json: &str,
    criteria_json: &str,
    match_type: &str,
) -> std::result::Result<String, JsValue> {
    find_first_json(json, criteria_json, match_type, true).map_err(to_js)
}

/// Key a collection by properties (JSON array of dot-paths).
///
/// With `meta`, returns `{keyed, overwritten, invalid}`.
#[wasm_bindgen(js_name = "keyByProperty")]
pub fn key_by_property(
    json: &str,
    properties_json: &str,
    meta: bool,
) -> std::result::Result<String, JsValue> {
    key_by_json(json, properties_json, meta).map_err(to_js)
}

/// Group a collection by properties (JSON array of dot-paths).
#[wasm_bindgen(js_name = "groupByProperty")]
pub fn group_by_property(json: &str, properties_json: &str) -> std::result::Result<String, JsValue> {
    group_by_json(json, properties_json).map_err(to_js)
}

/// Keep only the listed keys; `action` is `delete` or `nullify`.
#[wasm_bindgen(js_name = "keepKeys")]
pub fn keep_keys(json: &str, keys_json: &str, action: &str) -> std::result::Result<String, JsValue> {
    project_json(json, keys_json, action, true).map_err(to_js)
}

/// Remove the listed keys; `action` is `delete` or `nullify`.
#[wasm_bindgen(js_name = "removeKeys")]
pub fn remove_keys(json: &str, keys_json: &str, action: &str) -> std::result::Result<String, JsValue> {
    project_json(json, keys_json, action, false).map_err(to_js)
}
