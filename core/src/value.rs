//! The decoded output model: [`Value`] and [`Object`].

use core::fmt;

/// A decoded field value.
///
/// Primitive fields decode into the matching numeric variant; `string` and
/// `buffer` fields decode into `Str`/`Bytes`; `nest` and `choice` decode
/// into `Object`; `array` decodes into `Array`, or `Map` when declared with
/// a `key`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    UInt(u64),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Map(Object),
    Object(Object),
}

macro_rules! as_accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        /// Returns the inner value if this is a
        #[doc = concat!("`Value::", stringify!($variant), "`.")]
        pub fn $name(&self) -> Option<$ty> {
            match self {
                Value::$variant(v) => Some(*v),
                _ => None,
            }
        }
    };
}

impl Value {
    as_accessor!(as_uint, UInt, u64);
    as_accessor!(as_int, Int, i64);
    as_accessor!(as_float, Float, f64);

    /// Returns the inner string slice if this is a `Value::Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the inner byte slice if this is a `Value::Bytes`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// Returns the inner slice if this is a `Value::Array`.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Returns the inner object if this is a `Value::Object` or `Value::Map`.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) | Value::Map(o) => Some(o),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::UInt(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v:?}"),
            Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Value::Array(v) => write!(f, "<{} elements>", v.len()),
            Value::Map(_) | Value::Object(_) => write!(f, "<object>"),
        }
    }
}

/// An insertion-ordered `name -> value` mapping.
///
/// Field counts per descriptor are small in practice (binary formats rarely
/// declare more than a few dozen fields), so a linear-scan `Vec` beats a
/// hash map's overhead and keeps declaration order for `Debug` and
/// `PartialEq` — which matters for arrays converted to `Value::Map` by
/// `key`, where later entries must be free to overwrite earlier ones
/// without reshuffling unrelated fields.
#[derive(Debug, Clone, Default)]
pub struct Object {
    fields: Vec<(Box<str>, Value)>,
}

impl Object {
    /// Creates an empty object.
    #[inline]
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Creates an empty object with pre-allocated capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Inserts or overwrites a field, preserving the position of an
    /// existing entry with the same name.
    pub fn insert(&mut self, name: impl Into<Box<str>>, value: Value) {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n.as_ref() == name).map(|(_, v)| v)
    }

    /// Returns the number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if there are no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_ref(), v))
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a str, &'a Value);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a Value)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Serializes as a map, not as the `Vec<(Box<str>, Value)>` it's backed by —
/// a derived impl would expose the storage shape instead of the field/value
/// pairs callers actually care about.
#[cfg(feature = "serde")]
impl serde::Serialize for Object {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Object {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ObjectVisitor;

        impl<'de> serde::de::Visitor<'de> for ObjectVisitor {
            type Value = Object;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a map of field name to value")
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(self, mut map: A) -> Result<Object, A::Error> {
                let mut obj = Object::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, value)) = map.next_entry::<String, Value>()? {
                    obj.insert(name, value);
                }
                Ok(obj)
            }
        }

        deserializer.deserialize_map(ObjectVisitor)
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn object_round_trips_through_json_as_a_map() {
        let mut obj = Object::new();
        obj.insert("a", Value::UInt(1));
        obj.insert("s", Value::Str("hi".into()));

        let json = serde_json::to_string(&obj).unwrap();
        assert_eq!(json, r#"{"a":{"UInt":1},"s":{"Str":"hi"}}"#);

        let back: Object = serde_json::from_str(&json).unwrap();
        assert_eq!(back, obj);
    }
}
