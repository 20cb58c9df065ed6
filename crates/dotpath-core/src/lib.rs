//! # dotpath-core
//!
//! Pure transforms over dynamically-shaped, JSON-like nested data: dot-path
//! reads, flatten/inflate, and collection queries and indexing.
//!
//! Every transform takes its input by reference and builds a new tree; inputs
//! are never mutated. All containers preserve insertion order.
//!
//! ## Quick start
//!
//! ```rust
//! use dotpath_core::{flatten, inflate, read, Levels, Value};
//! use serde_json::json;
//!
//! let doc = Value::from(json!({"user": {"name": "Alice", "tags": ["a", "b"]}}));
//!
//! // Nested -> flat
//! let flat = flatten(&doc, ".", Levels::Unlimited);
//! assert_eq!(flat, Value::from(json!({"user.name": "Alice", "user.tags": ["a", "b"]})));
//!
//! // Flat -> nested (roundtrip)
//! assert_eq!(inflate(&flat, ".", Levels::Unlimited), doc);
//!
//! // Dot-path reads
//! assert_eq!(read(&doc, "user.tags.1", None), Value::from("b"));
//! ```
//!
//! ## Modules
//!
//! - [`value`] — `Value`, `Sequence`, `Key`, `Scalar` and the associative/positional classifier
//! - [`path`] — dot-path reads with default fallback (`read`, `read_many`)
//! - [`flatten`] — `flatten` / `inflate` with `Levels` bounds
//! - [`compare`] — `MatchType` and the loose/strict/case-insensitive comparisons
//! - [`query`] — `Criteria`, `filter_where`, `filter_where_not`, `find_first*`
//! - [`index`] — `key_by_property`, `group_by_property`
//! - [`project`] — `keep_keys`, `remove_keys`, `strip_key_prefix`
//! - [`collection`] — `pluck`, `sort_by_property`, `random`, `shuffle`
//! - [`map`] — `map_recursive` and casting into sequences
//! - [`error`] — Error types

pub mod collection;
pub mod compare;
pub mod error;
pub mod flatten;
pub mod index;
pub mod map;
pub mod path;
pub mod project;
pub mod query;
pub mod value;

pub use collection::{
    asort_by_property, map_entries, pluck, random, random_with_rng, shuffle, shuffle_with_rng,
    sort_by_property, SortMode, SortOrder,
};
pub use compare::MatchType;
pub use error::DotPathError;
pub use flatten::{flatten, inflate, Levels, DEFAULT_DELIMITER};
pub use index::{group_by_property, key_by_property, key_by_property_with_meta, KeyedIndex};
pub use map::{cast, cast_collection, cast_collection_with, cast_serialize, cast_with, map_recursive, Castable};
pub use path::{read, read_many, read_ref};
pub use project::{
    keep_keys, keep_keys_in_collection, remove_keys, remove_keys_in_collection, strip_key_prefix,
    RemovalAction,
};
pub use query::{
    filter_where, filter_where_not, find_first, find_first_where, find_first_where_not, Criteria,
    Verdict,
};
pub use value::{Key, Scalar, Sequence, Value};
