//! Shared helpers for the solverify crates: dynamic ABI value coercion and
//! encoding, plus the retry/sleep primitives used by the verification poller.

pub mod abi;
pub mod retry;
