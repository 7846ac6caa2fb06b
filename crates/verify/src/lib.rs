//! Solidity contract source verification.
//!
//! Resolves the constructor signature of a contract inside a flattened source
//! file, ABI-encodes the supplied constructor argument values, and submits the
//! source to an Etherscan-style explorer API, polling the returned job until
//! it leaves the pending state.

#[macro_use]
extern crate tracing;

pub mod ast;
pub mod error;
pub mod etherscan;
pub mod flatten;
pub mod networks;
pub mod solc;
mod verify;

pub use error::VerifyError;
pub use etherscan::{Client, VerificationApi, VerificationOutcome, VerificationStatus};
pub use networks::Networks;
pub use verify::{verify, VerifyRequest};
