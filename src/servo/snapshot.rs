//! Parameter snapshot for diagnostics.

use core::fmt;

use heapless::{String, Vec};

/// Most entries a snapshot can hold.
pub const SNAPSHOT_CAPACITY: usize = 32;

/// Value of one parameter in a [`ParamSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Enumerated setting, by canonical name.
    Text(&'static str),
    /// Free-form label such as the servo name.
    Name(String<32>),
    /// Numeric setting.
    Int(i64),
    /// Flag.
    Bool(bool),
    /// Optional setting that was never assigned.
    Unset,
}

impl ParamValue {
    /// Wrap an optional numeric setting.
    pub fn int_or_unset<T: Into<i64>>(value: Option<T>) -> Self {
        value.map_or(ParamValue::Unset, |v| ParamValue::Int(v.into()))
    }

    /// Wrap an optional enumerated setting.
    pub fn text_or_unset(value: Option<&'static str>) -> Self {
        value.map_or(ParamValue::Unset, ParamValue::Text)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Name(s) => f.write_str(s),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Unset => f.write_str("-"),
        }
    }
}

/// Ordered `name → value` pairs describing a controller's state.
///
/// Rendering is left to the caller; `Display` gives one `name : value`
/// line per entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSnapshot {
    entries: Vec<(&'static str, ParamValue), SNAPSHOT_CAPACITY>,
}

impl ParamSnapshot {
    /// Empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Entries past [`SNAPSHOT_CAPACITY`] are dropped.
    pub fn with(mut self, name: &'static str, value: ParamValue) -> Self {
        let _ = self.entries.push((name, value));
        self
    }

    /// Look up a value by parameter name.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ParamSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{} : {}", name, value)?;
        }
        Ok(())
    }
}
