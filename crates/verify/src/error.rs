use std::path::PathBuf;

/// Errors surfaced by a verification run.
///
/// Every variant reaches the immediate caller of [`verify`](crate::verify);
/// nothing is swallowed or silently retried besides the bounded pending poll
/// inside the status checker.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The network identifier has no configured verification endpoint.
    #[error("unsupported network `{0}`")]
    UnsupportedNetwork(String),

    /// The source unit contains no contract definition.
    #[error("no contract definition found in source")]
    NoContractFound,

    /// The source unit contains several contracts and none was named.
    #[error("more than one contract in file; a contract name must be specified")]
    AmbiguousContract,

    /// The explicitly named contract does not exist in the source unit.
    #[error("no contract named `{0}` found in source")]
    ContractNotFound(String),

    /// The constructor declares parameters but no values were supplied.
    #[error("constructor requires arguments; constructor argument values must be supplied")]
    MissingArguments,

    /// Values were supplied but the constructor takes no parameters.
    #[error("constructor takes no arguments, but argument values were supplied")]
    UnexpectedArguments,

    /// Argument coercion or encoding failed (carries arity mismatches too).
    #[error(transparent)]
    Encode(#[from] solverify_common::abi::EncodeError),

    /// A constructor parameter uses a type this tool cannot encode.
    #[error("unsupported constructor parameter type `{0}`")]
    UnsupportedType(String),

    /// The source text could not be parsed.
    #[error("failed to parse source: {0}")]
    Parse(String),

    /// The source file could not be read.
    #[error("failed to read source file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A request failed at the transport level. Never retried.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service rejected the submission outright.
    #[error("verification rejected by service: {0}")]
    ServiceRejection(String),

    /// The job stayed pending for the whole retry budget.
    #[error(
        "verification timed out after {attempts} status checks; \
         check the final status on the explorer"
    )]
    Timeout { attempts: u32 },

    /// The poll loop was cancelled by the caller.
    #[error("verification cancelled")]
    Cancelled,
}
