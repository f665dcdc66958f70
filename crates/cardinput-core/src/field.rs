use std::fmt;
use std::str::FromStr;

use crate::CardInputError;

/// One of the five editable units of a card form.
///
/// The declaration order is the order fields are laid out and advanced
/// through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum FieldId {
    Number,
    Expiry,
    Cvc,
    Name,
    PostalCode,
}

impl FieldId {
    pub const ALL: [FieldId; 5] = [
        FieldId::Number,
        FieldId::Expiry,
        FieldId::Cvc,
        FieldId::Name,
        FieldId::PostalCode,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Identifier as providers spell it (`"postalCode"`, not `"postal_code"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldId::Number => "number",
            FieldId::Expiry => "expiry",
            FieldId::Cvc => "cvc",
            FieldId::Name => "name",
            FieldId::PostalCode => "postalCode",
        }
    }

    /// Everything but the holder name takes digits.
    pub const fn is_numeric(self) -> bool {
        !matches!(self, FieldId::Name)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = CardInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| CardInputError::UnknownField(s.to_string()))
    }
}

/// Validity of a field value as judged by the State Provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum FieldStatus {
    Valid,
    Invalid,
    #[default]
    Incomplete,
}

impl FieldStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldStatus::Valid => "valid",
            FieldStatus::Invalid => "invalid",
            FieldStatus::Incomplete => "incomplete",
        }
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldStatus {
    type Err = CardInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "valid" => Ok(FieldStatus::Valid),
            "invalid" => Ok(FieldStatus::Invalid),
            "incomplete" => Ok(FieldStatus::Incomplete),
            other => Err(CardInputError::UnknownStatus(other.to_string())),
        }
    }
}

/// Sparse map keyed by [`FieldId`]. Iteration follows field order.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldMap<T> {
    slots: [Option<T>; 5],
}

impl<T> Default for FieldMap<T> {
    fn default() -> Self {
        Self {
            slots: [None, None, None, None, None],
        }
    }
}

impl<T> FieldMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FieldId) -> Option<&T> {
        self.slots[field.index()].as_ref()
    }

    pub fn get_mut(&mut self, field: FieldId) -> Option<&mut T> {
        self.slots[field.index()].as_mut()
    }

    /// Returns the previous entry, if any.
    pub fn insert(&mut self, field: FieldId, value: T) -> Option<T> {
        self.slots[field.index()].replace(value)
    }

    pub fn remove(&mut self, field: FieldId) -> Option<T> {
        self.slots[field.index()].take()
    }

    pub fn contains(&self, field: FieldId) -> bool {
        self.slots[field.index()].is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &T)> + '_ {
        FieldId::ALL
            .into_iter()
            .filter_map(|f| self.get(f).map(|v| (f, v)))
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.iter().map(|(f, _)| f)
    }

    pub fn with(mut self, field: FieldId, value: T) -> Self {
        self.insert(field, value);
        self
    }
}

impl<T> FromIterator<(FieldId, T)> for FieldMap<T> {
    fn from_iter<I: IntoIterator<Item = (FieldId, T)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (f, v) in iter {
            map.insert(f, v);
        }
        map
    }
}

impl<T> Extend<(FieldId, T)> for FieldMap<T> {
    fn extend<I: IntoIterator<Item = (FieldId, T)>>(&mut self, iter: I) {
        for (f, v) in iter {
            self.insert(f, v);
        }
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for FieldMap<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for FieldMap<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = std::collections::BTreeMap::<FieldId, T>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
