//! `#[serde(with)]` adapters reading signed integer tags into unsigned fields
//! of the same or a wider width, bit for bit (`TAG_Byte` -56 reads as 200).
//!
//! Plain unsigned fields already get this. Fields of a record embedded with
//! `#[serde(flatten)]` need the adapter, since serde buffers them first.
//!
//! | module       | field     | tags accepted        |
//! |--------------|-----------|----------------------|
//! | `byte`       | `u8`      | Byte                 |
//! | `short`      | `u16`     | Byte, Short          |
//! | `int`        | `u32`     | Byte, Short, Int     |
//! | `long`       | `u64`     | Byte, Short, Int, Long |
//! | `byte_array` | `Vec<u8>` | ByteArray, List of Byte |

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::marker::PhantomData;

trait Unsigned: Copy + TryFrom<u64> {
    const BITS: u32;

    fn from_signed(value: i64) -> Self;
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Unsigned for $ty {
                const BITS: u32 = <$ty>::BITS;

                fn from_signed(value: i64) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

impl_unsigned!(u8, u16, u32, u64);

struct Reinterpret<T>(PhantomData<T>);

impl<T: Unsigned> Reinterpret<T> {
    fn new() -> Self {
        Reinterpret(PhantomData)
    }

    fn signed<E: de::Error>(&self, value: i64, width: u32) -> Result<T, E> {
        if width > T::BITS {
            return Err(E::invalid_type(Unexpected::Signed(value), self));
        }
        Ok(T::from_signed(value))
    }
}

impl<'de, T: Unsigned> Visitor<'de> for Reinterpret<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an integer of at most {} bits", T::BITS)
    }

    fn visit_i8<E: de::Error>(self, v: i8) -> Result<T, E> {
        self.signed(v as i64, 8)
    }

    fn visit_i16<E: de::Error>(self, v: i16) -> Result<T, E> {
        self.signed(v as i64, 16)
    }

    fn visit_i32<E: de::Error>(self, v: i32) -> Result<T, E> {
        self.signed(v as i64, 32)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
        self.signed(v, 64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
        T::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }
}

macro_rules! scalar_module {
    ($name:ident, $ty:ty) => {
        pub mod $name {
            use serde::{Deserializer, Serialize, Serializer};

            pub fn serialize<S: Serializer>(value: &$ty, serializer: S) -> Result<S::Ok, S::Error> {
                value.serialize(serializer)
            }

            pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<$ty, D::Error> {
                deserializer.deserialize_any(super::Reinterpret::<$ty>::new())
            }
        }
    };
}

scalar_module!(byte, u8);
scalar_module!(short, u16);
scalar_module!(int, u32);
scalar_module!(long, u64);

struct ByteElement(u8);

impl<'de> Deserialize<'de> for ByteElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_any(Reinterpret::<u8>::new())
            .map(ByteElement)
    }
}

pub mod byte_array {
    use super::ByteElement;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let elements = Vec::<ByteElement>::deserialize(deserializer)?;
        Ok(elements.into_iter().map(|element| element.0).collect())
    }
}
