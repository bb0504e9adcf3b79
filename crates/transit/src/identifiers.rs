//! Type-safe, cheap-to-clone identifiers.
//!
//! All identifiers use Arc<str> for cheap cloning and minimal memory overhead.
//! They serialize as plain strings so persisted documents stay readable.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::departure::StopPointReference;

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(Clone, Debug)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(s: impl AsRef<str>) -> Self {
                Self(s.as_ref().into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.cmp(&other.0)
            }
        }

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                String::deserialize(deserializer).map(Self::from)
            }
        }
    };
}

impl_identifier!(StopKey);
impl_identifier!(UserIdentifier);

impl StopKey {
    /// Separator between the stop point name and its designation.
    pub const SEPARATOR: char = '_';

    /// Grouping and favorite identity for a stop point: `name_designation`.
    ///
    /// Missing parts are replaced by the empty string, so a stop point without
    /// a designation still yields a stable key (`"Slussen_"`).
    pub fn for_stop_point(stop_point: &StopPointReference) -> Self {
        Self::new(format!(
            "{}{}{}",
            stop_point.name.as_deref().unwrap_or_default(),
            Self::SEPARATOR,
            stop_point.designation.as_deref().unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_point(name: Option<&str>, designation: Option<&str>) -> StopPointReference {
        StopPointReference {
            id: 1,
            name: name.map(Into::into),
            designation: designation.map(Into::into),
        }
    }

    #[test]
    fn test_identifier_equality() {
        let id1 = StopKey::new("Slussen_A");
        let id2 = StopKey::new("Slussen_A");
        let id3 = id1.clone();

        assert_eq!(id1, id2);
        assert_eq!(id1, id3);
        assert!(Arc::ptr_eq(&id1.0, &id3.0)); // Clone shares Arc
    }

    #[test]
    fn test_identifier_hash() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(StopKey::new("test"), 42);

        assert_eq!(map.get(&StopKey::new("test")), Some(&42));
    }

    #[test]
    fn test_identifier_ordering() {
        let mut keys = vec![StopKey::new("Z_"), StopKey::new("A_"), StopKey::new("M_2")];
        keys.sort();
        let keys: Vec<&str> = keys.iter().map(StopKey::as_str).collect();
        assert_eq!(keys, ["A_", "M_2", "Z_"]);
    }

    #[test]
    fn test_identifier_serde_is_transparent() {
        let key = StopKey::new("Odenplan_1");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"Odenplan_1\"");

        let back: StopKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_stop_key_for_stop_point() {
        assert_eq!(
            StopKey::for_stop_point(&stop_point(Some("Slussen"), Some("C"))).as_str(),
            "Slussen_C"
        );
        assert_eq!(
            StopKey::for_stop_point(&stop_point(Some("Slussen"), None)).as_str(),
            "Slussen_"
        );
        assert_eq!(StopKey::for_stop_point(&stop_point(None, None)).as_str(), "_");
    }
}
