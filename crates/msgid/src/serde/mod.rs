//! `#[serde(with = ...)]` helpers for [`MsgId`](crate::MsgId).
//!
//! - [`as_token`]: the 24 character base64 token
//! - [`as_native`]: the `(millis, packed)` integer pair

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod as_token {
    use super::{Deserializer, Serializer};
    use crate::{MsgId, TOKEN_LEN};

    /// Serialize a [`MsgId`] as its base64 token.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &MsgId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut buf = [0u8; TOKEN_LEN];
        id.encode_to_buf(&mut buf);
        let token =
            core::str::from_utf8(&buf).map_err(<S::Error as serde::ser::Error>::custom)?;
        s.serialize_str(token)
    }

    /// Deserialize a [`MsgId`] from its base64 token.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not valid standard base64
    /// - The string does not decode to exactly 16 bytes
    pub fn deserialize<'de, D>(d: D) -> Result<MsgId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TokenVisitor;

        impl serde::de::Visitor<'_> for TokenVisitor {
            type Value = MsgId;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a base64 encoded msg id token")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                MsgId::decode(v).map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_str(TokenVisitor)
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod as_native {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::MsgId;

    /// Serialize a [`MsgId`] as its `(millis, packed)` pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &MsgId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (id.millis(), id.packed()).serialize(s)
    }

    /// Deserialize a [`MsgId`] from its `(millis, packed)` pair.
    ///
    /// Like token decoding, no semantic validation is applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails.
    pub fn deserialize<'de, D>(d: D) -> Result<MsgId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (millis, packed) = <(i64, i64)>::deserialize(d)?;
        Ok(MsgId::from_parts(millis, packed))
    }
}
