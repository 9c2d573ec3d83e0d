use once_cell::sync::Lazy;
use serde::de::{Error as DeError, Unexpected};
use std::{
    fmt::{Debug, Display},
    hash::Hash,
    marker::PhantomData,
    num::NonZeroU64,
    str::FromStr,
};
use thiserror::Error;

use self::marker::{
    CommentMarker, FollowMarker, ImageMarker, LikeMarker, Marker, TagMarker, UserMarker,
};

pub mod marker;

pub type CommentId = Id<CommentMarker>;
pub type FollowId = Id<FollowMarker>;
pub type ImageId = Id<ImageMarker>;
pub type LikeId = Id<LikeMarker>;
pub type TagId = Id<TagMarker>;
pub type UserId = Id<UserMarker>;

/// Database identifier of a row, typed by what kind of row it
/// points to. Rows are keyed by Postgres `BIGSERIAL` columns, so a
/// valid id is always within `1..=i64::MAX`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Id<T: Marker> {
    value: NonZeroU64,
    phantom: PhantomData<T>,
}

impl<T: Marker> Id<T> {
    #[allow(clippy::cast_sign_loss)]
    const MAX: u64 = i64::MAX as u64;

    /// # Panics
    ///
    /// It will panic if the value is 0 or beyond [`i64::MAX`].
    #[must_use]
    #[track_caller]
    pub const fn new(n: u64) -> Self {
        if let Some(id) = Self::new_checked(n) {
            id
        } else {
            panic!("value is zero or out of range")
        }
    }

    #[must_use]
    pub const fn new_checked(n: u64) -> Option<Self> {
        if n > Self::MAX {
            return None;
        }

        if let Some(n) = NonZeroU64::new(n) {
            Some(Self {
                value: n,
                phantom: PhantomData,
            })
        } else {
            None
        }
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.value.get()
    }

    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn as_i64(self) -> i64 {
        // already checked in `new_checked`
        self.value.get() as i64
    }

}

impl<T: Marker> Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // This is to improve performance but it will not be a significant boost because
        // we're going to use this for telemetry anyway. It's better than nothing.
        use heck::ToSnakeCase;
        static MARKER_MODULE: Lazy<String> = Lazy::new(|| {
            format!(
                "{}::types::id::marker::",
                env!("CARGO_PKG_NAME").to_snake_case()
            )
        });

        // This is to assume that all ID markers are defined in `marker` module
        let type_name = std::any::type_name::<T>();
        let type_name = if type_name.starts_with(&*MARKER_MODULE) {
            type_name.split("::").last().unwrap_or(type_name)
        } else {
            type_name
        };
        write!(f, "Id::<{type_name}>({})", self.value.get())
    }
}

impl<T: Marker> Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.value.get(), f)
    }
}

impl<T: Marker> Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.value.get());
    }
}

/// Raised when a path segment or other text is not a valid id.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0:?} is not a valid id")]
pub struct ParseIdError(String);

impl<T: Marker> FromStr for Id<T> {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .ok()
            .and_then(Self::new_checked)
            .ok_or_else(|| ParseIdError(s.to_string()))
    }
}

impl<'de, T: Marker> serde::Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor<T: Marker>(PhantomData<T>);

        impl<'de, T: Marker> serde::de::Visitor<'de> for Visitor<T> {
            type Value = Id<T>;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a positive 63-bit integer id")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                let value = u64::try_from(v)
                    .map_err(|_| DeError::invalid_value(Unexpected::Signed(v), &"positive id"))?;

                self.visit_u64(value)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Id::<T>::new_checked(v)
                    .ok_or_else(|| DeError::invalid_value(Unexpected::Unsigned(v), &"positive id"))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                let value = v.parse().map_err(|_| {
                    let unexpected = Unexpected::Str(v);
                    DeError::invalid_value(unexpected, &"positive id string")
                })?;

                self.visit_u64(value)
            }
        }

        deserializer.deserialize_any(Visitor(PhantomData))
    }
}

impl<T: Marker> serde::Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let value = self.value.get().to_string();
        serializer.collect_str(&value)
    }
}

impl<T: Marker> From<Id<T>> for sea_query::Value {
    fn from(value: Id<T>) -> Self {
        sea_query::Value::BigInt(Some(value.as_i64()))
    }
}

impl<'q, T: Marker> sqlx::Encode<'q, sqlx::Postgres> for Id<T> {
    // already checked in `new_checked`
    #[allow(clippy::cast_possible_wrap)]
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::database::HasArguments<'q>>::ArgumentBuffer,
    ) -> sqlx::encode::IsNull {
        <i64 as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&(self.value.get() as i64), buf)
    }
}

impl<'r, T: Marker> sqlx::Decode<'r, sqlx::Postgres> for Id<T> {
    // already checked
    #[allow(clippy::cast_sign_loss)]
    fn decode(
        value: <sqlx::Postgres as sqlx::database::HasValueRef<'r>>::ValueRef,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        #[derive(Debug, Error)]
        #[error("all IDs must be positive")]
        struct NegativeIdError;

        #[derive(Debug, Error)]
        #[error("all IDs must not be equal to 0")]
        struct EqualToZeroError;

        let value = <i64 as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        if value.is_negative() {
            Err(Box::new(NegativeIdError))
        } else if let Some(inner) = Self::new_checked(value as u64) {
            Ok(inner)
        } else {
            Err(Box::new(EqualToZeroError))
        }
    }
}

impl<T: Marker> sqlx::Type<sqlx::Postgres> for Id<T> {
    fn type_info() -> <sqlx::Postgres as sqlx::Database>::TypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}
