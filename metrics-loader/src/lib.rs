//! Loading glyph metrics from files.
//!
//! This crate consists of two parts: a macro for declaring which fields of a
//! metrics struct may be overridden from a file, and a function that reads
//! such a file and produces an updated copy of the struct.
//!
//! ## File format
//!
//! The format is simple: each non-blank line must contain a key/value pair,
//! separated by a colon. Anything after `//` or `#` is a comment. Keys are
//! matched against field names without regard to case, so `BOX_SIZE` and
//! `box_size` name the same field.
//!
//! ## Value types:
//!
//! All values are floats, and must be a string that can be parsed by
//! `f64::from_str`.
//!
//! ## Example file
//!
//! ```text
//! // a slightly chunkier border
//! BOX_STROKE_WIDTH:   48
//! CORNER_RADIUS:      120
//! ```
//!
//! Keys that are not present in the file keep the value they had before
//! loading; keys that are present but not declared are an error.

mod parse;

pub use parse::iter_items;

use std::collections::HashMap;
use std::path::Path;

/// The raw key/value pairs read from a metrics file.
pub type RawMetrics<'a> = HashMap<&'a str, &'a str>;

/// A macro for declaring the set of fields that can be loaded from a file.
///
/// Every listed field must be an `f64`, and the type must implement `Clone`.
///
/// # Examples
///
/// ```
/// use metrics_loader::{loadable_metrics, LoadableMetrics};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Frame {
///     size: f64,
///     margin: f64,
/// }
///
/// loadable_metrics!(Frame { size, margin });
///
/// let raw: metrics_loader::RawMetrics = [("SIZE", "12")].iter().copied().collect();
/// let loaded = Frame { size: 1.0, margin: 2.0 }.load(&raw).unwrap();
/// assert_eq!(loaded, Frame { size: 12.0, margin: 2.0 });
/// ```
#[macro_export]
macro_rules! loadable_metrics {
    ($ty:ident { $($field:ident),+ } ) => {
        impl $crate::LoadableMetrics for $ty {
            fn load(&self, raw: &$crate::RawMetrics) -> Result<Self, $crate::MetricsLoadError> {
                let mut loaded = self.clone();
                let mut unexpected_keys = Vec::new();

                for (key, val) in raw.iter() {
                    $(
                    if key.eq_ignore_ascii_case(stringify!($field)) {
                        loaded.$field = val.parse::<f64>().map_err(|err| {
                            $crate::MetricsLoadError::ParseFloatError(key.to_string(), err)
                        })?;
                        continue;
                    }
                    )+
                    unexpected_keys.push(key.to_string());
                }

                if unexpected_keys.is_empty() {
                    Ok(loaded)
                } else {
                    unexpected_keys.sort();
                    Err($crate::MetricsLoadError::UnexpectedKeys(unexpected_keys))
                }
            }

            fn keys(&self) -> &'static [&'static str] {
                &[$(stringify!($field)),+]
            }
        }
    };
    // also work with a trailing comma
    ($ty:ident { $($field:ident),+, } ) => {
        $crate::loadable_metrics!($ty { $( $field ),+ });
    };
}

/// A set of metrics that can be loaded from disk.
///
/// This is essentially a schema.
///
/// You should not implement this trait directly, but rather should use the
/// [`loadable_metrics`] macro to generate it.
pub trait LoadableMetrics: Sized {
    /// Return a copy of `self` with every key in `raw` applied.
    fn load(&self, raw: &RawMetrics) -> Result<Self, MetricsLoadError>;

    /// The names of the fields that can be loaded.
    fn keys(&self) -> &'static [&'static str];
}

/// A type for errors that occur when loading metrics from a file.
#[derive(Debug, thiserror::Error)]
pub enum MetricsLoadError {
    #[error("io error loading metrics: '{0}'")]
    IoError(#[from] std::io::Error),
    #[error("metrics failed to parse value for '{0}': '{1}'")]
    ParseFloatError(String, std::num::ParseFloatError),
    #[error("metrics file contained undeclared keys: {0:?}")]
    UnexpectedKeys(Vec<String>),
    #[error("metrics contained malformed line {line}: '{}'", .text.escape_debug())]
    ParseLineError { line: usize, text: String },
}

/// Parse metrics from a string, applying them on top of `base`.
pub fn load_str<T: LoadableMetrics>(s: &str, base: &T) -> Result<T, MetricsLoadError> {
    let raw = iter_items(s).collect::<Result<RawMetrics, _>>()?;
    log::debug!("applying {} metric overrides", raw.len());
    base.load(&raw)
}

/// Read the file at `path` and apply its metrics on top of `base`.
pub fn load_file<T: LoadableMetrics>(
    path: impl AsRef<Path>,
    base: &T,
) -> Result<T, MetricsLoadError> {
    let path = path.as_ref();
    log::info!("loading metrics from {:?}", path);
    let contents = std::fs::read_to_string(path)?;
    load_str(&contents, base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Frame {
        size: f64,
        stroke_width: f64,
    }

    loadable_metrics!(Frame {
        size,
        stroke_width,
    });

    const BASE: Frame = Frame {
        size: 800.0,
        stroke_width: 40.0,
    };

    #[test]
    fn partial_override() {
        let loaded = load_str("STROKE_WIDTH: 48", &BASE).unwrap();
        assert_eq!(loaded.size, 800.0);
        assert_eq!(loaded.stroke_width, 48.0);
    }

    #[test]
    fn unknown_key() {
        let err = load_str("SIZE: 10\nCOLOR: 12", &BASE).unwrap_err();
        assert!(matches!(err, MetricsLoadError::UnexpectedKeys(keys) if keys == ["COLOR"]));
    }

    #[test]
    fn bad_float() {
        let err = load_str("size: wide", &BASE).unwrap_err();
        assert!(matches!(err, MetricsLoadError::ParseFloatError(key, _) if key == "size"));
    }

    #[test]
    fn declared_keys() {
        assert_eq!(BASE.keys(), &["size", "stroke_width"]);
    }

    #[test]
    fn missing_file() {
        let path = std::env::temp_dir().join("metrics-loader-does-not-exist.txt");
        assert!(matches!(
            load_file(&path, &BASE),
            Err(MetricsLoadError::IoError(_))
        ));
    }
}
