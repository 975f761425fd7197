/// A result type defaulting to [`DecodeError`].
///
/// Decoding a token is the only fallible operation in `msgid`; generation,
/// packing and encoding are total.
pub type Result<T, E = DecodeError> = core::result::Result<T, E>;

/// Errors returned when turning a token back into a [`MsgId`].
///
/// [`MsgId`]: crate::MsgId
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The input is not valid standard (padded) base64.
    #[error("malformed base64 token: {0}")]
    Malformed(#[from] base64::DecodeError),

    /// The input decoded to a payload that is not exactly 16 bytes.
    #[error("decoded token must be 16 bytes, got {len}")]
    InvalidLength {
        /// Number of bytes the token actually decoded to.
        len: usize,
    },
}
