#[macro_use]
extern crate serde;

mod ballot;
mod batch;
mod binary_proof;
mod dlog;
mod error;
mod group;
mod keygen;
mod serde_hex;
mod tally;
mod vote;

pub use ballot::*;
pub use batch::*;
pub use binary_proof::*;
pub use dlog::*;
pub use error::*;
pub use group::*;
pub use keygen::*;
pub use serde_hex::*;
pub use tally::*;
pub use vote::*;

#[cfg(test)]
mod tests;
