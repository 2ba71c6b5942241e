//! Operator attributes
//!
//! Attributes carry per-call options for [`execute`](super::execute). The
//! recognized ones are:
//!
//! | Name | Kind | Used by | Meaning |
//! |------|------|---------|---------|
//! | `broadcast` | int | arithmetic ops | `0` requires identical shapes; absent or `1` broadcasts |
//! | `axis` | int | arithmetic ops | alignment start of the smaller input (two inputs only) |
//! | `axis` | int | `Flatten` | split position, default 1 |
//!
//! Unrecognized attributes are ignored.

use crate::broadcast::BroadcastConfig;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute name for the broadcast switch
pub const BROADCAST: &str = "broadcast";

/// Attribute name for the alignment / split axis
pub const AXIS: &str = "axis";

/// Default `axis` for `Flatten`
pub const DEFAULT_FLATTEN_AXIS: i64 = 1;

/// A single attribute value
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// List of integers
    Ints(Vec<i64>),
    /// String
    Str(String),
}

impl AttrValue {
    /// Name of the value kind, for error messages
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Ints(_) => "ints",
            Self::Str(_) => "string",
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Ints(v) => write!(f, "{v:?}"),
            Self::Str(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Vec<i64>> for AttrValue {
    fn from(v: Vec<i64>) -> Self {
        Self::Ints(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// Ordered map of attribute name to value
///
/// # Example
///
/// ```
/// use tensorwise::broadcast::BroadcastConfig;
/// use tensorwise::ops::Attributes;
///
/// let attrs = Attributes::new().with("broadcast", 1i64).with("axis", 0i64);
/// assert_eq!(attrs.broadcast_config(2).unwrap(), BroadcastConfig::with_axis(0));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    values: BTreeMap<String, AttrValue>,
}

impl Attributes {
    /// Empty attribute set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace an attribute, returning the previous value
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Option<AttrValue> {
        self.values.insert(name.into(), value.into())
    }

    /// Look up an attribute
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.values.get(name)
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no attributes are set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate attributes in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Integer attribute, `None` if absent
    ///
    /// Fails with `InvalidAttribute` if the attribute holds another kind.
    pub fn get_int(&self, name: &str) -> Result<Option<i64>> {
        match self.values.get(name) {
            None => Ok(None),
            Some(AttrValue::Int(v)) => Ok(Some(*v)),
            Some(other) => Err(Error::invalid_attribute(
                name,
                format!("expected int, got {}", other.kind()),
            )),
        }
    }

    /// Broadcasting options described by `broadcast` and `axis`
    ///
    /// `rank` is the rank reported in `InvalidAxis` errors. `axis` is only
    /// consulted while broadcasting is enabled.
    pub fn broadcast_config(&self, rank: usize) -> Result<BroadcastConfig> {
        let enabled = match self.get_int(BROADCAST)? {
            None | Some(1) => true,
            Some(0) => false,
            Some(v) => {
                return Err(Error::invalid_attribute(
                    BROADCAST,
                    format!("expected 0 or 1, got {v}"),
                ));
            }
        };

        if !enabled {
            return Ok(BroadcastConfig::DISABLED);
        }

        match self.get_int(AXIS)? {
            None => Ok(BroadcastConfig::NUMPY),
            Some(axis) => {
                let axis = usize::try_from(axis).map_err(|_| Error::InvalidAxis { axis, rank })?;
                Ok(BroadcastConfig::with_axis(axis))
            }
        }
    }

    /// Split axis for `Flatten`, defaulting to 1
    ///
    /// Fails with `InvalidAxis` unless `0 <= axis <= rank`.
    pub fn flatten_axis(&self, rank: usize) -> Result<usize> {
        let axis = self.get_int(AXIS)?.unwrap_or(DEFAULT_FLATTEN_AXIS);
        match usize::try_from(axis) {
            Ok(a) if a <= rank => Ok(a),
            _ => Err(Error::InvalidAxis { axis, rank }),
        }
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
