use core::fmt;
use std::time::SystemTime;

use crate::time::millis_to_system_time;

/// Size of the binary form of a [`MsgId`], in bytes.
pub const BYTE_LEN: usize = 16;

/// A 128-bit message id: creation time plus a packed spawner id and sequence.
///
/// ```text
///  Bit Index:  127            64 63              32 31             0
///              +----------------+------------------+---------------+
///  Field:      |  millis (64)   | spawner id (32)  | sequence (32) |
///              +----------------+------------------+---------------+
///              |<-- millis --->|<------------- packed ------------>|
/// ```
///
/// Ids are plain values: they are never mutated after creation and can be
/// copied and shared freely. Ordering compares `millis` first and `packed`
/// second, so ids sort by creation time.
///
/// Generators only ever place sequence values up to [`MAX_SEQUENCE`] in the
/// low half, which keeps its top byte zero. Nothing here enforces that: any
/// pair of 64-bit values is a valid `MsgId` as far as the codec is
/// concerned.
///
/// [`MAX_SEQUENCE`]: crate::MAX_SEQUENCE
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MsgId {
    millis: i64,
    packed: i64,
}

impl MsgId {
    pub const SPAWNER_ID_BITS: u32 = 32;
    pub const SEQUENCE_BITS: u32 = 32;

    pub const SEQUENCE_SHIFT: u32 = 0;
    pub const SPAWNER_ID_SHIFT: u32 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;

    pub const SPAWNER_ID_MASK: u64 = (1 << Self::SPAWNER_ID_BITS) - 1;
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Builds an id from its raw `millis` and `packed` fields.
    #[must_use]
    pub const fn from_parts(millis: i64, packed: i64) -> Self {
        Self { millis, packed }
    }

    /// Builds an id from a timestamp, spawner id and sequence value.
    ///
    /// Both halves are masked to 32 bits as unsigned values before they are
    /// combined, so a negative sequence never sign-extends into the spawner
    /// id.
    ///
    /// # Example
    ///
    /// ```
    /// use msgid::MsgId;
    ///
    /// let id = MsgId::from_components(0, -1, 7);
    /// assert_eq!(id.spawner_id(), -1);
    /// assert_eq!(id.sequence(), 7);
    /// assert_eq!(id.packed(), (0xFFFF_FFFF_u64 << 32 | 7) as i64);
    /// ```
    #[must_use]
    pub const fn from_components(millis: i64, spawner_id: i32, sequence: i32) -> Self {
        let s = (spawner_id as u32 as u64 & Self::SPAWNER_ID_MASK) << Self::SPAWNER_ID_SHIFT;
        let q = (sequence as u32 as u64 & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self::from_parts(millis, (s | q) as i64)
    }

    /// Milliseconds since the Unix epoch at which the id was created.
    #[must_use]
    pub const fn millis(&self) -> i64 {
        self.millis
    }

    /// The packed spawner id and sequence field.
    #[must_use]
    pub const fn packed(&self) -> i64 {
        self.packed
    }

    /// The spawner id: the high 32 bits of [`Self::packed`], as signed.
    #[must_use]
    pub const fn spawner_id(&self) -> i32 {
        ((self.packed as u64 >> Self::SPAWNER_ID_SHIFT) & Self::SPAWNER_ID_MASK) as u32 as i32
    }

    /// The sequence value: the low 32 bits of [`Self::packed`], as signed.
    ///
    /// Sequences repeat after the generator's counter wraps or its process
    /// restarts; only the full id (with [`Self::millis`]) is unique.
    #[must_use]
    pub const fn sequence(&self) -> i32 {
        ((self.packed as u64 >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK) as u32 as i32
    }

    /// The creation time with millisecond precision.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::millis`] lies outside what [`SystemTime`] can
    /// represent on this platform. This never happens for ids created by a
    /// generator.
    #[must_use]
    pub fn time(&self) -> SystemTime {
        millis_to_system_time(self.millis)
    }

    /// The id as a single unsigned integer, `millis` in the high half.
    #[must_use]
    pub const fn to_raw(&self) -> u128 {
        (self.millis as u64 as u128) << 64 | self.packed as u64 as u128
    }

    /// Inverse of [`Self::to_raw`].
    #[must_use]
    pub const fn from_raw(raw: u128) -> Self {
        Self::from_parts((raw >> 64) as u64 as i64, raw as u64 as i64)
    }

    /// The 16-byte binary form: big-endian `millis` then big-endian `packed`.
    #[must_use]
    pub const fn to_be_bytes(&self) -> [u8; BYTE_LEN] {
        self.to_raw().to_be_bytes()
    }

    /// Reads an id from its 16-byte binary form.
    #[must_use]
    pub const fn from_be_bytes(bytes: [u8; BYTE_LEN]) -> Self {
        Self::from_raw(u128::from_be_bytes(bytes))
    }
}

impl fmt::Debug for MsgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MsgId")
            .field("millis", &self.millis)
            .field("spawner_id", &self.spawner_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl From<MsgId> for u128 {
    fn from(id: MsgId) -> Self {
        id.to_raw()
    }
}

impl From<u128> for MsgId {
    fn from(raw: u128) -> Self {
        Self::from_raw(raw)
    }
}
