//! The verification pipeline: flatten, select, resolve, encode, submit, poll.

use crate::{
    ast,
    error::VerifyError,
    etherscan::{self, Client, VerificationOutcome, VerifyContract, VERIFY_POLL},
    flatten::{Flatten, SingleFileSource},
    networks::Networks,
    solc::{self, CompilerVersion, PragmaVersion},
};
use alloy_primitives::{hex, Address};
use solverify_common::{abi, retry::TokioSleeper};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Inputs for one verification run. Optional fields default at request-build
/// time, in [VerifyContract::from_request].
#[derive(Clone, Debug)]
pub struct VerifyRequest {
    /// Verification service API key.
    pub key: String,
    /// Path to the (self-contained) source file.
    pub path: PathBuf,
    /// Address of the deployed contract.
    pub address: Address,
    /// Network identifier, resolved against the configured [Networks].
    pub network: String,
    /// Explicit contract name, required when the file holds several
    /// contracts.
    pub contract_name: Option<String>,
    /// Constructor argument values, in declaration order.
    pub constructor_values: Option<Vec<String>>,
    /// Optimizer run count override.
    pub runs: Option<u32>,
    /// License type identifier override.
    pub license_type: Option<u32>,
    /// Whether the contract was compiled with the optimizer enabled.
    pub optimize: bool,
    /// EVM version override, omitted from the submission when unset.
    pub evm_version: Option<String>,
    /// Compiler version override; otherwise inferred from the source pragma.
    pub compiler_version: Option<String>,
    /// Suppresses progress narration.
    pub quiet: bool,
}

/// Runs a full verification: resolves the endpoint, reads and parses the
/// source, encodes constructor arguments, submits, and polls the job to a
/// terminal state.
///
/// Runs are independent; callers may verify several contracts concurrently
/// against a shared (read-only) [Networks]. Cancelling `token` aborts an
/// in-progress poll loop.
pub async fn verify(
    request: &VerifyRequest,
    networks: &Networks,
    token: CancellationToken,
) -> Result<VerificationOutcome, VerifyError> {
    // resolved before any file or network work
    let endpoint = networks.endpoint(&request.network)?.clone();

    let source = SingleFileSource.flatten(&request.path)?;
    let prepared = build_request(request, source)?;

    info!(
        network = %request.network,
        contract = %prepared.contract_name,
        address = %prepared.address,
        "submitting verification request"
    );
    if !request.quiet {
        println!("Verifying `{}` at {} on {}", prepared.contract_name, prepared.address, request.network);
    }

    let client = Client::new(endpoint, request.key.clone());
    etherscan::submit_and_poll(&client, &prepared, &VERIFY_POLL, &TokioSleeper, &token, request.quiet)
        .await
}

/// Builds the wire request from a flattened source text: selects the target
/// contract, resolves and encodes constructor arguments, and determines the
/// compiler version. Pure with respect to the network.
pub(crate) fn build_request(
    request: &VerifyRequest,
    source: String,
) -> Result<VerifyContract, VerifyError> {
    let (unit, _comments) = solang_parser::parse(&source, 0)
        .map_err(|diagnostics| VerifyError::Parse(render_diagnostics(&diagnostics)))?;

    let contract = ast::select_contract(&unit, request.contract_name.as_deref())?;
    let contract_name = contract
        .name
        .as_ref()
        .map(|id| id.name.clone())
        .ok_or_else(|| VerifyError::Parse("selected contract has no name".to_string()))?;

    let types = ast::resolve_constructor_types(&unit, contract)?;
    let constructor_arguments = match (&request.constructor_values, types.is_empty()) {
        (Some(_), true) => return Err(VerifyError::UnexpectedArguments),
        (None, false) => return Err(VerifyError::MissingArguments),
        (None, true) => None,
        (Some(values), false) => {
            let type_names: Vec<&str> = types.iter().map(|ty| ty.abi.as_str()).collect();
            let encoded = abi::encode_constructor_args(&type_names, values)?;
            // hex string without the 0x prefix, as the service expects
            Some(hex::encode(encoded))
        }
    };

    let compiler_version = match &request.compiler_version {
        Some(version) => solc::normalize_override(version),
        None => PragmaVersion.compiler_version(&source)?,
    };

    Ok(VerifyContract::from_request(
        request,
        contract_name,
        source,
        compiler_version,
        constructor_arguments,
    ))
}

fn render_diagnostics(diagnostics: &[solang_parser::diagnostics::Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|diagnostic| diagnostic.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    fn request(source_values: Option<Vec<String>>) -> VerifyRequest {
        VerifyRequest {
            key: "testkey".to_string(),
            path: "Contract.sol".into(),
            address: address!("d8509bee9c9bf012282ad33aba0d87241baf5064"),
            network: "mainnet".to_string(),
            contract_name: None,
            constructor_values: source_values,
            runs: None,
            license_type: None,
            optimize: false,
            evm_version: None,
            compiler_version: None,
            quiet: true,
        }
    }

    #[tokio::test]
    async fn unknown_network_fails_before_any_io() {
        let mut req = request(None);
        req.network = "unknown-chain".to_string();
        req.path = "/does/not/exist.sol".into();

        let err = verify(&req, &Networks::default(), CancellationToken::new())
            .await
            .unwrap_err();

        // the missing file is never touched
        assert!(matches!(err, VerifyError::UnsupportedNetwork(n) if n == "unknown-chain"));
    }

    #[test]
    fn builds_request_with_encoded_arguments() {
        let source = "pragma solidity ^0.8.19;\n\
                      contract Foo { constructor(uint256 a, address b) { } }"
            .to_string();
        let req = request(Some(vec![
            "42".to_string(),
            "0x1111111111111111111111111111111111111111".to_string(),
        ]));

        let built = build_request(&req, source).unwrap();
        assert_eq!(built.contract_name, "Foo");
        assert_eq!(built.compiler_version, "v0.8.19");
        let args = built.constructor_arguments.unwrap();
        assert!(!args.starts_with("0x"));
        assert_eq!(
            args,
            "000000000000000000000000000000000000000000000000000000000000002a\
             0000000000000000000000001111111111111111111111111111111111111111"
        );
    }

    #[test]
    fn values_for_argless_constructor_are_rejected() {
        let source = "pragma solidity ^0.8.19;\ncontract Foo { constructor() { } }".to_string();
        let req = request(Some(vec!["42".to_string()]));
        let err = build_request(&req, source).unwrap_err();
        assert!(matches!(err, VerifyError::UnexpectedArguments));
    }

    #[test]
    fn missing_values_for_parameterized_constructor_are_rejected() {
        let source =
            "pragma solidity ^0.8.19;\ncontract Foo { constructor(uint256 a) { } }".to_string();
        let err = build_request(&request(None), source).unwrap_err();
        assert!(matches!(err, VerifyError::MissingArguments));
    }

    #[test]
    fn arity_mismatch_is_an_encoding_error() {
        let source = "pragma solidity ^0.8.19;\n\
                      contract Foo { constructor(uint256 a, uint256 b) { } }"
            .to_string();
        let req = request(Some(vec!["1".to_string()]));
        let err = build_request(&req, source).unwrap_err();
        assert!(matches!(err, VerifyError::Encode(_)));
    }

    #[test]
    fn no_constructor_builds_without_arguments() {
        let source = "pragma solidity ^0.8.19;\ncontract Foo { }".to_string();
        let built = build_request(&request(None), source).unwrap();
        assert!(built.constructor_arguments.is_none());
    }

    #[test]
    fn explicit_compiler_version_wins_over_pragma() {
        let mut req = request(None);
        req.compiler_version = Some("0.8.21+commit.d9974bed".to_string());
        let source = "pragma solidity ^0.8.19;\ncontract Foo { }".to_string();
        let built = build_request(&req, source).unwrap();
        assert_eq!(built.compiler_version, "v0.8.21+commit.d9974bed");
    }

    #[test]
    fn unparseable_source_is_a_parse_error() {
        let err = build_request(&request(None), "contract {".to_string()).unwrap_err();
        assert!(matches!(err, VerifyError::Parse(_)));
    }
}
