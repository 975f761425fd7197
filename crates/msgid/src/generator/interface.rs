use crate::MsgId;

/// A minimal interface for generating [`MsgId`]s.
pub trait MsgIdGenerator {
    /// Returns the spawner id stamped into every generated id.
    fn spawner_id(&self) -> i32;

    /// Returns the next id, advancing the generator's counter.
    fn next_id(&self) -> MsgId;

    /// Returns the next id encoded as a base64 token.
    fn next_token(&self) -> String {
        self.next_id().encode()
    }
}
