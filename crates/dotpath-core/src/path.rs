//! Dot-path read access into a value tree.
//!
//! A path such as `"user.address.city"` is split on `.` and walked one key at
//! a time. The separator is always `.` for reads, whatever delimiter is used
//! for [`flatten`](crate::flatten::flatten).
//!
//! A stored `null` is indistinguishable from a missing path: both resolve as
//! absent and both trigger default substitution.

use crate::value::{Key, Sequence, Value};

/// Separator for dot-path reads and composite index keys.
pub const PATH_SEPARATOR: char = '.';

/// Resolve `path` against `root`, borrowing the found value.
///
/// Returns `None` when a segment is missing, when an intermediate node is not
/// a sequence, or when the value found is `null`.
pub fn read_ref<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split(PATH_SEPARATOR) {
        current = current.as_sequence()?.get(&Key::parse(segment))?;
        if current.is_null() {
            return None;
        }
    }
    Some(current)
}

/// Resolve `path` against `root`, falling back to `default` (or `null` when
/// no default is given) if the path is absent.
///
/// # Examples
///
/// ```
/// use dotpath_core::{read, Value};
/// use serde_json::json;
///
/// let root = Value::from(json!({"a": {"aa": "v"}}));
/// assert_eq!(read(&root, "a.aa", None), Value::from("v"));
/// assert_eq!(read(&root, "x.y.z", Some(&Value::from("d"))), Value::from("d"));
/// ```
pub fn read(root: &Value, path: &str, default: Option<&Value>) -> Value {
    match read_ref(root, path) {
        Some(found) => found.clone(),
        None => default.cloned().unwrap_or(Value::NULL),
    }
}

/// Read several paths at once. The result is flat: each entry is keyed by the
/// original path string, not nested.
pub fn read_many<S: AsRef<str>>(root: &Value, paths: &[S], default: Option<&Value>) -> Sequence {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            (Key::parse(path), read(root, path, default))
        })
        .collect()
}
