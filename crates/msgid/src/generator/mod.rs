mod basic;
mod counter;
mod interface;
mod lock;
#[cfg(test)]
mod tests;

pub use basic::*;
pub use counter::*;
pub use interface::*;
pub use lock::*;
