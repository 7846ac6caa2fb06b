//! Etherscan-style verification API: wire types, HTTP client and the bounded
//! submit/poll state machine.

use crate::{error::VerifyError, verify::VerifyRequest};
use serde::{Deserialize, Serialize};
use solverify_common::retry::{RetryPolicy, Sleeper};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;
use yansi::Paint;

/// The literal status the service reports while a job is queued.
pub const PENDING_IN_QUEUE: &str = "Pending in queue";

/// Poll budget while waiting for a verification job: 10 status checks, 3
/// seconds apart. A tunable constant, not a protocol requirement.
pub const VERIFY_POLL: RetryPolicy = RetryPolicy::new(10, Duration::from_millis(3000));

/// Default optimizer run count reported when the caller does not override it.
pub const DEFAULT_RUNS: u32 = 200;

/// Default license type identifier (1 = no license).
pub const DEFAULT_LICENSE_TYPE: u32 = 1;

/// A `verifysourcecode` submission, form-encoded with the service's exact
/// field names (including the historical `constructorArguements` spelling).
#[derive(Clone, Debug, Serialize)]
pub struct VerifyContract {
    pub apikey: String,
    pub module: String,
    pub action: String,
    #[serde(rename = "contractaddress")]
    pub address: String,
    #[serde(rename = "sourceCode")]
    pub source: String,
    #[serde(rename = "codeformat")]
    pub code_format: String,
    #[serde(rename = "contractname")]
    pub contract_name: String,
    #[serde(rename = "compilerversion")]
    pub compiler_version: String,
    #[serde(rename = "optimizationUsed")]
    pub optimization_used: String,
    pub runs: String,
    #[serde(rename = "evmVersion", skip_serializing_if = "Option::is_none")]
    pub evm_version: Option<String>,
    #[serde(rename = "licenseType")]
    pub license_type: String,
    #[serde(rename = "constructorArguements", skip_serializing_if = "Option::is_none")]
    pub constructor_arguments: Option<String>,
}

impl VerifyContract {
    /// Builds the submission from resolved inputs. Defaults are applied here,
    /// once: `runs` falls back to [DEFAULT_RUNS], `licenseType` to
    /// [DEFAULT_LICENSE_TYPE], and the optimization flag is rendered as
    /// `"1"`/`"0"`.
    pub fn from_request(
        request: &VerifyRequest,
        contract_name: String,
        source: String,
        compiler_version: String,
        constructor_arguments: Option<String>,
    ) -> Self {
        Self {
            apikey: request.key.clone(),
            module: "contract".to_string(),
            action: "verifysourcecode".to_string(),
            address: request.address.to_string(),
            source,
            code_format: "solidity-single-file".to_string(),
            contract_name,
            compiler_version,
            optimization_used: if request.optimize { "1" } else { "0" }.to_string(),
            runs: request.runs.unwrap_or(DEFAULT_RUNS).to_string(),
            evm_version: request.evm_version.clone(),
            license_type: request.license_type.unwrap_or(DEFAULT_LICENSE_TYPE).to_string(),
            constructor_arguments,
        }
    }
}

/// A raw service response. `status == "0"` signals rejection or failure;
/// `result` carries either an error message, a job GUID, or a status string.
#[derive(Clone, Debug, Deserialize)]
pub struct ResponseData {
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub result: String,
}

/// Terminal state of a verification job, as determined by the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerificationStatus {
    Success,
    Failure,
}

/// The outcome of a completed verification run.
#[derive(Clone, Debug)]
pub struct VerificationOutcome {
    /// The service-assigned job identifier.
    pub guid: String,
    /// The service's own final determination.
    pub status: VerificationStatus,
    /// The final status payload (e.g. `Pass - Verified`).
    pub message: String,
}

impl VerificationOutcome {
    pub fn is_success(&self) -> bool {
        self.status == VerificationStatus::Success
    }
}

/// The remote verification service, seen through its two operations. The
/// HTTP-backed implementation is [Client]; tests script this seam directly.
#[async_trait::async_trait]
pub trait VerificationApi: Send + Sync {
    /// Submits the source for verification.
    async fn submit_contract_verification(
        &self,
        request: &VerifyContract,
    ) -> Result<ResponseData, VerifyError>;

    /// Checks the status of a previously submitted job.
    async fn check_verification_status(&self, guid: &str) -> Result<ResponseData, VerifyError>;
}

/// HTTP client for an Etherscan-compatible verification endpoint.
#[derive(Clone, Debug)]
pub struct Client {
    api_url: Url,
    api_key: String,
    client: reqwest::Client,
}

impl Client {
    pub fn new(api_url: Url, api_key: impl Into<String>) -> Self {
        Self { api_url, api_key: api_key.into(), client: reqwest::Client::new() }
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }
}

#[async_trait::async_trait]
impl VerificationApi for Client {
    async fn submit_contract_verification(
        &self,
        request: &VerifyContract,
    ) -> Result<ResponseData, VerifyError> {
        trace!(url = %self.api_url, contract = %request.contract_name, "submitting verification");
        let response = self
            .client
            .post(self.api_url.clone())
            .form(request)
            .send()
            .await?
            .json::<ResponseData>()
            .await?;
        trace!(?response, "received submission response");
        Ok(response)
    }

    async fn check_verification_status(&self, guid: &str) -> Result<ResponseData, VerifyError> {
        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[
                ("module", "contract"),
                ("action", "checkverifystatus"),
                ("guid", guid),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .json::<ResponseData>()
            .await?;
        trace!(?response, "received status response");
        Ok(response)
    }
}

/// Submits the request and polls the resulting job to a terminal state.
///
/// A submission the service rejects (`status == "0"`) fails immediately with
/// the service's message; transport errors propagate without retry.
pub async fn submit_and_poll<A, S>(
    api: &A,
    request: &VerifyContract,
    policy: &RetryPolicy,
    sleeper: &S,
    token: &CancellationToken,
    quiet: bool,
) -> Result<VerificationOutcome, VerifyError>
where
    A: VerificationApi,
    S: Sleeper,
{
    let response = api.submit_contract_verification(request).await?;
    if response.status == "0" {
        return Err(VerifyError::ServiceRejection(response.result));
    }

    let guid = response.result;
    debug!(%guid, "verification submitted");
    if !quiet {
        println!("Submitted verification request. GUID: `{guid}`");
    }

    poll_verification(api, &guid, policy, sleeper, token, quiet).await
}

/// Polls the status endpoint until the job leaves the pending state or the
/// retry budget is exhausted.
///
/// The interval sleep precedes every status check, including the first
/// (reference behavior). Attempt N+1 never starts before attempt N's response
/// is known. Cancelling `token` stops the loop and surfaces
/// [VerifyError::Cancelled].
pub async fn poll_verification<A, S>(
    api: &A,
    guid: &str,
    policy: &RetryPolicy,
    sleeper: &S,
    token: &CancellationToken,
    quiet: bool,
) -> Result<VerificationOutcome, VerifyError>
where
    A: VerificationApi,
    S: Sleeper,
{
    for attempt in 1..=policy.max_attempts {
        if token.is_cancelled() {
            return Err(VerifyError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = token.cancelled() => return Err(VerifyError::Cancelled),
            _ = sleeper.sleep(policy.delay) => {}
        }

        let response = api.check_verification_status(guid).await?;
        if response.result == PENDING_IN_QUEUE {
            debug!(attempt, "verification still pending");
            if !quiet {
                println!("{}", "Pending in queue...".yellow());
                println!("{}", "Please wait...".yellow());
            }
            continue;
        }

        let status = if response.status == "0" {
            VerificationStatus::Failure
        } else {
            VerificationStatus::Success
        };
        return Ok(VerificationOutcome {
            guid: guid.to_string(),
            status,
            message: response.result,
        });
    }

    Err(VerifyError::Timeout { attempts: policy.max_attempts })
}
