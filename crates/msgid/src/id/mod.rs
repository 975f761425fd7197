mod msg_id;
mod token;

pub use msg_id::*;
pub use token::*;
