//! `#[serde(with = "quarry_nbt::timestamp")]` for `SystemTime` fields stored
//! as `TAG_Long` seconds since the Unix epoch.

use serde::{Deserialize, Deserializer, Serializer};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub fn serialize<S: Serializer>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(to_seconds(*time))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SystemTime, D::Error> {
    i64::deserialize(deserializer).map(from_seconds)
}

/// Whole seconds since the epoch, rounded towards negative infinity.
pub fn to_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs() as i64,
        Err(err) => {
            let before = err.duration();
            let secs = -(before.as_secs() as i64);
            if before.subsec_nanos() > 0 {
                secs - 1
            } else {
                secs
            }
        }
    }
}

pub fn from_seconds(secs: i64) -> SystemTime {
    let offset = Duration::from_secs(secs.unsigned_abs());
    let time = if secs >= 0 {
        UNIX_EPOCH.checked_add(offset)
    } else {
        UNIX_EPOCH.checked_sub(offset)
    };
    time.unwrap_or(UNIX_EPOCH)
}

/// The same encoding for `Vec<SystemTime>`, written as a list of `TAG_Long`.
pub mod seq {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::SystemTime;

    pub fn serialize<S: Serializer>(times: &[SystemTime], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(times.iter().map(|&time| super::to_seconds(time)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<SystemTime>, D::Error> {
        let secs = Vec::<i64>::deserialize(deserializer)?;
        Ok(secs.into_iter().map(super::from_seconds).collect())
    }
}
