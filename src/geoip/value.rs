//! Typed values decoded from a geo-database record.
//!
//! MMDB records are self-describing trees of maps, arrays and primitive
//! values. [`DataValue`] keeps that tree together with the type of every
//! primitive, so a field lookup can tell "missing" apart from "wrong type".

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

/// Data types a database value can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// UTF-8 string
    Utf8String,
    /// 64-bit float
    Double,
    /// Raw bytes
    Bytes,
    /// Unsigned 16-bit integer
    Uint16,
    /// Unsigned 32-bit integer
    Uint32,
    /// String-keyed map
    Map,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 64-bit integer
    Uint64,
    /// Unsigned 128-bit integer
    Uint128,
    /// Array of values
    Array,
    /// Boolean
    Boolean,
    /// 32-bit float
    Float,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Utf8String => "utf8_string",
            DataType::Double => "double",
            DataType::Bytes => "bytes",
            DataType::Uint16 => "uint16",
            DataType::Uint32 => "uint32",
            DataType::Map => "map",
            DataType::Int32 => "int32",
            DataType::Uint64 => "uint64",
            DataType::Uint128 => "uint128",
            DataType::Array => "array",
            DataType::Boolean => "boolean",
            DataType::Float => "float",
        };
        f.write_str(name)
    }
}

/// A value decoded from a database record.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// A UTF-8 string
    Utf8String(String),
    /// A 64-bit float
    Double(f64),
    /// A byte string
    Bytes(Vec<u8>),
    /// An unsigned 16-bit integer
    Uint16(u16),
    /// An unsigned 32-bit integer
    Uint32(u32),
    /// A map of nested values, keyed by string
    Map(BTreeMap<String, DataValue>),
    /// A signed 32-bit integer
    Int32(i32),
    /// An unsigned 64-bit integer
    Uint64(u64),
    /// An unsigned 128-bit integer
    Uint128(u128),
    /// An array of nested values
    Array(Vec<DataValue>),
    /// A boolean
    Boolean(bool),
    /// A 32-bit float
    Float(f32),
}

impl DataValue {
    /// Returns the type of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            DataValue::Utf8String(_) => DataType::Utf8String,
            DataValue::Double(_) => DataType::Double,
            DataValue::Bytes(_) => DataType::Bytes,
            DataValue::Uint16(_) => DataType::Uint16,
            DataValue::Uint32(_) => DataType::Uint32,
            DataValue::Map(_) => DataType::Map,
            DataValue::Int32(_) => DataType::Int32,
            DataValue::Uint64(_) => DataType::Uint64,
            DataValue::Uint128(_) => DataType::Uint128,
            DataValue::Array(_) => DataType::Array,
            DataValue::Boolean(_) => DataType::Boolean,
            DataValue::Float(_) => DataType::Float,
        }
    }

    /// Follows `path` through nested maps and arrays.
    ///
    /// Map levels are addressed by key and array levels by decimal index.
    /// Returns `None` as soon as a level has no data for the next element.
    pub fn get_path(&self, path: &[&str]) -> Option<&DataValue> {
        path.iter().try_fold(self, |value, key| match value {
            DataValue::Map(map) => map.get(*key),
            DataValue::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Builds a map value from key/value pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, DataValue)>,
    {
        DataValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Utf8String(value.to_string())
    }
}

impl From<u32> for DataValue {
    fn from(value: u32) -> Self {
        DataValue::Uint32(value)
    }
}

struct DataValueVisitor;

impl<'de> Visitor<'de> for DataValueVisitor {
    type Value = DataValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a MaxMind DB value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<DataValue, E> {
        Ok(DataValue::Boolean(v))
    }

    fn visit_i32<E: de::Error>(self, v: i32) -> Result<DataValue, E> {
        Ok(DataValue::Int32(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<DataValue, E> {
        i32::try_from(v)
            .map(DataValue::Int32)
            .map_err(|_| E::custom(format!("signed value {} out of int32 range", v)))
    }

    fn visit_u8<E: de::Error>(self, v: u8) -> Result<DataValue, E> {
        Ok(DataValue::Uint16(v.into()))
    }

    fn visit_u16<E: de::Error>(self, v: u16) -> Result<DataValue, E> {
        Ok(DataValue::Uint16(v))
    }

    fn visit_u32<E: de::Error>(self, v: u32) -> Result<DataValue, E> {
        Ok(DataValue::Uint32(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<DataValue, E> {
        Ok(DataValue::Uint64(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<DataValue, E> {
        Ok(DataValue::Uint128(v))
    }

    fn visit_f32<E: de::Error>(self, v: f32) -> Result<DataValue, E> {
        Ok(DataValue::Float(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<DataValue, E> {
        Ok(DataValue::Double(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<DataValue, E> {
        Ok(DataValue::Utf8String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<DataValue, E> {
        Ok(DataValue::Utf8String(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<DataValue, E> {
        Ok(DataValue::Bytes(v.to_vec()))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<DataValue, E> {
        Ok(DataValue::Bytes(v))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<DataValue, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<DataValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(DataValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DataValue, A::Error> {
        let mut map = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<String, DataValue>()? {
            map.insert(key, value);
        }
        Ok(DataValue::Map(map))
    }
}

impl<'de> Deserialize<'de> for DataValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DataValueVisitor)
    }
}
