use core::{fmt, str::FromStr};

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{BYTE_LEN, DecodeError, MsgId, Result};

/// Length of a token: standard padded base64 of [`BYTE_LEN`] bytes.
pub const TOKEN_LEN: usize = BYTE_LEN.div_ceil(3) * 4;

impl MsgId {
    /// Encodes this id as a 24 character token using standard (padded)
    /// base64 over its [big-endian bytes](Self::to_be_bytes).
    ///
    /// Tokens are safe to use as map keys or to send as text. They do not
    /// sort in creation order; compare decoded ids for that.
    ///
    /// # Example
    ///
    /// ```
    /// use msgid::MsgId;
    ///
    /// let id = MsgId::from_components(0, 3, 1);
    /// assert_eq!(id.encode(), "AAAAAAAAAAAAAAADAAAAAQ==");
    /// ```
    #[must_use]
    pub fn encode(&self) -> String {
        STANDARD.encode(self.to_be_bytes())
    }

    /// Encodes this id into `buf` without allocating.
    ///
    /// # Example
    ///
    /// ```
    /// use msgid::{MsgId, TOKEN_LEN};
    ///
    /// let id = MsgId::from_components(0, 3, 1);
    /// let mut buf = [0u8; TOKEN_LEN];
    /// id.encode_to_buf(&mut buf);
    /// assert_eq!(&buf, b"AAAAAAAAAAAAAAADAAAAAQ==");
    /// ```
    pub fn encode_to_buf(&self, buf: &mut [u8; TOKEN_LEN]) {
        let written = STANDARD.encode_slice(self.to_be_bytes(), buf);
        debug_assert_eq!(written, Ok(TOKEN_LEN));
    }

    /// Decodes a token produced by [`Self::encode`].
    ///
    /// This is a structural decode only: any token carrying 16 bytes yields
    /// an id, whether or not a generator could have produced it.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Malformed`] if `token` is not valid standard base64
    /// - [`DecodeError::InvalidLength`] if it does not decode to exactly
    ///   16 bytes
    ///
    /// # Example
    ///
    /// ```
    /// use msgid::{DecodeError, MsgId};
    ///
    /// let id = MsgId::decode("AAAAAAAAAAAAAAADAAAAAQ==").unwrap();
    /// assert_eq!(id.spawner_id(), 3);
    /// assert_eq!(id.sequence(), 1);
    ///
    /// let err = MsgId::decode("AAAAAAAAAAAAAAAAAAAA").unwrap_err();
    /// assert_eq!(err, DecodeError::InvalidLength { len: 15 });
    /// ```
    pub fn decode(token: &str) -> Result<Self> {
        let bytes = STANDARD.decode(token)?;
        let bytes: [u8; BYTE_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| DecodeError::InvalidLength { len: bytes.len() })?;
        Ok(Self::from_be_bytes(bytes))
    }
}

impl fmt::Display for MsgId {
    /// Writes the base64 token.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; TOKEN_LEN];
        self.encode_to_buf(&mut buf);
        f.write_str(core::str::from_utf8(&buf).map_err(|_| fmt::Error)?)
    }
}

impl FromStr for MsgId {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}
