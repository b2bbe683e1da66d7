//! `#[serde(with = "quarry_nbt::flag")]` for `bool` fields stored as a
//! `TAG_Byte` or a textual `TAG_String`.
//!
//! Plain `bool` fields already get these conversions. Fields of a record
//! embedded with `#[serde(flatten)]` are buffered by serde before they are
//! decoded, so they need this adapter to keep them.

use crate::de::parse_bool;
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;

pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(*value)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    deserializer.deserialize_any(FlagVisitor)
}

struct FlagVisitor;

impl<'de> Visitor<'de> for FlagVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a byte or a textual boolean")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_i8<E: de::Error>(self, v: i8) -> Result<bool, E> {
        Ok(v != 0)
    }

    fn visit_u8<E: de::Error>(self, v: u8) -> Result<bool, E> {
        Ok(v != 0)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
        parse_bool(v).ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
    }
}
