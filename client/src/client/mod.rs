//! # Client Session Handle
//!
//! A [`Client`] is the explicit session object: endpoints, transport, an
//! optional wallet, and a visible cache. Nothing is process-global — two
//! clients with two wallets coexist without racing on shared state, and a
//! wallet-less client can still serve the read-only surface.
//!
//! The client splits along the three remote services it talks to:
//!
//! - **blockchain** — REST ledger API (accounts, balances, broadcasts).
//! - **blocksync** — the indexer (entity listings, DID docs).
//! - **cell node** — per-project document service, reached through the
//!   signed/public JSON-RPC envelopes in [`crate::rpc`].
//!
//! Thin call wrappers live in the `entities`, `staking`, and `bonds`
//! submodules; this module owns the plumbing they share.

pub mod bonds;
pub mod cache;
pub mod entities;
pub mod staking;
pub mod transport;

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::config::{
    CELLNODE_PUBLIC_PATH, CELLNODE_REQUEST_PATH, DEFAULT_BLOCKCHAIN_URL, DEFAULT_BLOCKSCAN_URL,
    DEFAULT_BLOCKSYNC_URL, DEFAULT_CELLNODE_URL, NATIVE_DENOM,
};
use crate::error::Error;
use crate::rpc::{authenticated_rpc_msg, extract_result, public_rpc_msg, CellnodeSignature};
use crate::signing::SigningError;
use crate::tx::{account_field_to_string, BroadcastReq, Fee, Msg, SignDoc};
use crate::wallet::{SignerRole, Wallet};

use cache::SessionCache;
use transport::{HttpTransport, Transport};

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// The four service URLs a client talks to.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Blockchain REST endpoint.
    pub blockchain: String,
    /// Blocksync (indexer) endpoint.
    pub blocksync: String,
    /// Fallback cell-node endpoint for projects without their own.
    pub cellnode: String,
    /// Block-scan (transaction history) endpoint.
    pub blockscan: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            blockchain: DEFAULT_BLOCKCHAIN_URL.to_string(),
            blocksync: DEFAULT_BLOCKSYNC_URL.to_string(),
            cellnode: DEFAULT_CELLNODE_URL.to_string(),
            blockscan: DEFAULT_BLOCKSCAN_URL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Cell-node targeting
// ---------------------------------------------------------------------------

/// What a cell-node call is aimed at.
#[derive(Debug, Clone)]
pub enum CellnodeTarget {
    /// A cell-node base URL, used directly.
    Url(String),
    /// A project DID; the project record is fetched to find its cell node.
    ProjectDid(String),
    /// An already-fetched project record.
    Record(Value),
}

/// A resolved cell-node destination.
#[derive(Debug, Clone)]
pub(crate) struct EntityHead {
    pub project_did: Option<String>,
    pub service_endpoint: String,
}

/// One cell-node call, built once the project DID is known.
pub(crate) struct CnCall {
    pub method: String,
    pub template: Option<String>,
    pub data: Value,
    pub is_public: bool,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// The SDK session handle.
pub struct Client {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    dashify_urls: bool,
    wallet: Option<Wallet>,
    cache: SessionCache,
}

impl Client {
    /// Build a client over the default endpoints and HTTP transport.
    ///
    /// Pass `None` for a read-only client; signing operations then fail
    /// with [`SigningError::UnknownSigner`].
    pub fn new(wallet: Option<Wallet>) -> Result<Self, Error> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(
            wallet,
            Endpoints::default(),
            false,
            Arc::new(transport),
        ))
    }

    /// Build a client with explicit endpoints, URL dashification, and
    /// transport. This is also the test seam: hand in a mock transport and
    /// the full client logic runs without a network.
    pub fn with_transport(
        wallet: Option<Wallet>,
        endpoints: Endpoints,
        dashify_urls: bool,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            transport,
            endpoints,
            dashify_urls,
            wallet,
            cache: SessionCache::new(),
        }
    }

    /// The attached wallet, if any.
    pub fn wallet(&self) -> Option<&Wallet> {
        self.wallet.as_ref()
    }

    /// The configured endpoints.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Drop cached remote lookups (e.g. after a chain upgrade).
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }

    fn require_wallet(&self, role: SignerRole) -> Result<&Wallet, Error> {
        self.wallet
            .as_ref()
            .ok_or_else(|| SigningError::UnknownSigner(role.to_string()).into())
    }

    // -----------------------------------------------------------------------
    // Fetch plumbing
    // -----------------------------------------------------------------------

    pub(crate) async fn bc_get(
        &self,
        path: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Value, Error> {
        let url = format!("{}{}", self.endpoints.blockchain, path);
        tracing::debug!(%url, "blockchain GET");
        Ok(self.transport.get(&url, params).await?.into_body()?)
    }

    pub(crate) async fn bc_post(&self, path: &str, body: &Value) -> Result<Value, Error> {
        let url = format!("{}{}", self.endpoints.blockchain, path);
        tracing::debug!(%url, "blockchain POST");
        Ok(self.transport.post(&url, body).await?.into_body()?)
    }

    pub(crate) async fn bs_get(&self, path: &str) -> Result<Value, Error> {
        let url = format!("{}{}", self.endpoints.blocksync, path);
        tracing::debug!(%url, "blocksync GET");
        Ok(self.transport.get(&url, None).await?.into_body()?)
    }

    pub(crate) async fn scan_get(&self, path: &str) -> Result<Value, Error> {
        let url = format!("{}{}", self.endpoints.blockscan, path);
        tracing::debug!(%url, "blockscan GET");
        Ok(self.transport.get(&url, None).await?.into_body()?)
    }

    async fn cn_post(&self, url: &str, body: &Value) -> Result<Value, Error> {
        tracing::debug!(%url, "cellnode POST");
        Ok(self.transport.post(url, body).await?.into_body()?)
    }

    // -----------------------------------------------------------------------
    // Chain facts
    // -----------------------------------------------------------------------

    /// The node info document, fetched once per session.
    pub async fn node_info(&self) -> Result<Value, Error> {
        if let Some(cached) = self.cache.node_info() {
            return Ok(cached);
        }
        let body = self.bc_get("/node_info", None).await?;
        let info = body
            .get("node_info")
            .cloned()
            .ok_or_else(|| Error::UnexpectedResponse("missing node_info".into()))?;
        self.cache.set_node_info(info.clone());
        Ok(info)
    }

    async fn chain_id(&self) -> Result<String, Error> {
        let info = self.node_info().await?;
        info["network"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::UnexpectedResponse("node_info has no network".into()))
    }

    /// The chain's account record for an address.
    pub async fn chain_account(&self, address: &str) -> Result<Value, Error> {
        self.bc_get(&format!("/cosmos/auth/v1beta1/accounts/{address}"), None)
            .await
    }

    /// Account record for the transaction (secp) key.
    pub async fn get_secp_account(&self) -> Result<Value, Error> {
        let wallet = self.require_wallet(SignerRole::Secp)?;
        self.chain_account(&wallet.account(SignerRole::Secp).address)
            .await
    }

    /// Account record for the agent key.
    pub async fn get_agent_account(&self) -> Result<Value, Error> {
        let wallet = self.require_wallet(SignerRole::Agent)?;
        self.chain_account(&wallet.account(SignerRole::Agent).address)
            .await
    }

    /// Balances for one of the wallet's accounts, optionally narrowed to a
    /// single denomination.
    pub async fn balances(&self, role: SignerRole, denom: Option<&str>) -> Result<Value, Error> {
        let wallet = self.require_wallet(role)?;
        let address = wallet.account(role).address;
        let mut path = format!("/cosmos/bank/v1beta1/balances/{address}");
        if let Some(denom) = denom {
            path.push('/');
            path.push_str(denom);
        }
        self.bc_get(&path, None).await
    }

    /// Transaction history for an address and asset from the block-scan
    /// service.
    pub async fn transactions(&self, address: &str, asset: &str) -> Result<Value, Error> {
        self.scan_get(&format!(
            "/transactions/listTransactionsByAddrByAsset/{address}/{asset}"
        ))
        .await
    }

    /// A DID document from the indexer.
    pub async fn get_did_doc(&self, did: &str) -> Result<Value, Error> {
        self.bs_get(&format!("/api/did/getByDid/{did}")).await
    }

    // -----------------------------------------------------------------------
    // Broadcast path
    // -----------------------------------------------------------------------

    /// Sign a message with the given role and broadcast it.
    ///
    /// Fetches the account coordinates and chain id, assembles the
    /// sign-doc, signs its canonical form, and POSTs the broadcast body to
    /// `/txs` in `sync` mode.
    pub async fn sign_and_broadcast(
        &self,
        role: SignerRole,
        msg: Msg,
        fee: Fee,
        memo: &str,
    ) -> Result<Value, Error> {
        let wallet = self.require_wallet(role)?;
        let address = wallet.account(role).address;

        let account = self.chain_account(&address).await?;
        let account = account
            .get("account")
            .ok_or_else(|| Error::UnexpectedResponse("account record missing".into()))?;
        let account_number = account
            .get("account_number")
            .map(account_field_to_string)
            .ok_or_else(|| Error::UnexpectedResponse("account_number missing".into()))?;
        let sequence = account
            .get("sequence")
            .map(account_field_to_string)
            .ok_or_else(|| Error::UnexpectedResponse("sequence missing".into()))?;

        let sign_doc = SignDoc {
            account_number,
            chain_id: self.chain_id().await?,
            fee,
            memo: memo.to_string(),
            msgs: vec![msg],
            sequence,
        };

        let envelope = wallet.sign(role, &sign_doc)?;
        let body = BroadcastReq::new(sign_doc, envelope.signature);
        let body = serde_json::to_value(&body)
            .map_err(|e| Error::UnexpectedResponse(e.to_string()))?;

        self.bc_post("/txs", &body).await
    }

    /// Broadcast an arbitrary message with an explicit fee — the escape
    /// hatch for message types without a dedicated wrapper.
    pub async fn custom(&self, role: SignerRole, msg: Msg, fee: Fee) -> Result<Value, Error> {
        self.sign_and_broadcast(role, msg, fee, "").await
    }

    /// Register the wallet's agent DID on the ledger.
    ///
    /// Uses the wallet's own verification key unless an explicit `pub_key`
    /// is supplied.
    pub async fn register(&self, pub_key: Option<&str>) -> Result<Value, Error> {
        let wallet = self.require_wallet(SignerRole::Agent)?;
        let verify_key = pub_key.unwrap_or_else(|| wallet.agent().verify_key());
        let msg = Msg::add_did(wallet.did(), verify_key);
        self.sign_and_broadcast(SignerRole::Agent, msg, Fee::default(), "")
            .await
    }

    /// Send tokens from the transaction account.
    pub async fn send_tokens(
        &self,
        to_address: &str,
        amount: u64,
        denom: Option<&str>,
    ) -> Result<Value, Error> {
        let wallet = self.require_wallet(SignerRole::Secp)?;
        let from = wallet.account(SignerRole::Secp).address;
        let msg = Msg::send(&from, to_address, amount, denom.unwrap_or(NATIVE_DENOM));
        self.sign_and_broadcast(SignerRole::Secp, msg, Fee::default(), "")
            .await
    }

    // -----------------------------------------------------------------------
    // Cell-node dispatch
    // -----------------------------------------------------------------------

    /// Resolve a target to its project DID and cell-node endpoint.
    ///
    /// A project record names its cell node under
    /// `data.nodes.items[@type == "CellNode"].serviceEndpoint`. When that
    /// lookup fails the default endpoint is substituted — with a warning,
    /// since the substitution can mask a genuinely broken project record.
    pub(crate) async fn resolve_entity_head(
        &self,
        target: CellnodeTarget,
    ) -> Result<EntityHead, Error> {
        match target {
            CellnodeTarget::Url(url) => Ok(EntityHead {
                project_did: None,
                service_endpoint: url,
            }),
            CellnodeTarget::ProjectDid(did) => {
                let record = self.get_entity(&did).await?;
                self.head_from_record(&record)
            }
            CellnodeTarget::Record(record) => self.head_from_record(&record),
        }
    }

    fn head_from_record(&self, record: &Value) -> Result<EntityHead, Error> {
        let project_did = record["projectDid"].as_str().map(str::to_string);

        let endpoint = record["data"]["nodes"]["items"]
            .as_array()
            .and_then(|items| {
                items
                    .iter()
                    .find(|item| item["@type"].as_str() == Some("CellNode"))
            })
            .and_then(|node| node["serviceEndpoint"].as_str())
            .map(|url| url.trim_end_matches('/').to_string());

        let service_endpoint = match endpoint {
            Some(url) => {
                if self.dashify_urls {
                    dashify_url(&url)
                } else {
                    url
                }
            }
            None => {
                tracing::warn!(
                    project_did = project_did.as_deref().unwrap_or("<unknown>"),
                    fallback = %self.endpoints.cellnode,
                    "project has no CellNode service entry; using default cell node"
                );
                self.endpoints.cellnode.clone()
            }
        };

        Ok(EntityHead {
            project_did,
            service_endpoint,
        })
    }

    /// Dispatch one cell-node call.
    ///
    /// Authenticated calls sign the request data with the agent key and
    /// attach the timestamped signature block. Returns the RPC `result`
    /// together with the endpoint the call went to (file uploads need it to
    /// build public URLs).
    pub(crate) async fn cn_rpc<F>(
        &self,
        target: CellnodeTarget,
        build: F,
    ) -> Result<(Value, String), Error>
    where
        F: FnOnce(Option<&str>, &str) -> CnCall,
    {
        // A wallet is required even for public calls; the cell node treats
        // the client as an authenticated session throughout.
        let wallet = self.require_wallet(SignerRole::Agent)?;

        let head = self.resolve_entity_head(target).await?;
        let call = build(head.project_did.as_deref(), &head.service_endpoint);

        let message = if call.is_public {
            public_rpc_msg(&call.method, call.data)
        } else {
            let envelope = wallet.sign(SignerRole::Agent, &call.data)?;
            let signature = CellnodeSignature {
                type_: wallet.account(SignerRole::Agent).algo,
                created: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                creator: wallet.did().to_string(),
                signature_value: envelope.signature.signature,
            };
            authenticated_rpc_msg(&call.method, call.template.as_deref(), call.data, signature)
        };

        let path = if call.is_public {
            CELLNODE_PUBLIC_PATH
        } else {
            CELLNODE_REQUEST_PATH
        };
        let url = format!("{}{}", head.service_endpoint, path);

        let body = serde_json::to_value(&message)
            .map_err(|e| Error::UnexpectedResponse(e.to_string()))?;
        let response = self.cn_post(&url, &body).await?;
        let result = extract_result(response)?;

        Ok((result, head.service_endpoint))
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoints", &self.endpoints)
            .field("wallet", &self.wallet)
            .finish_non_exhaustive()
    }
}

/// Replace underscores with dashes in a URL's host component.
///
/// Some hosting setups serve `foo_bar` records on `foo-bar` hosts; when
/// enabled, the client rewrites endpoints and media URLs accordingly.
pub fn dashify_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let (host, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, ""),
    };
    format!("{scheme}://{}{path}", host.replace('_', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashify_rewrites_host_only() {
        assert_eq!(
            dashify_url("https://cell_node.example.org/public/x_y"),
            "https://cell-node.example.org/public/x_y"
        );
    }

    #[test]
    fn dashify_without_path() {
        assert_eq!(
            dashify_url("https://cell_node.example.org"),
            "https://cell-node.example.org"
        );
    }

    #[test]
    fn dashify_leaves_plain_urls_alone() {
        assert_eq!(
            dashify_url("https://cellnode.example.org/api"),
            "https://cellnode.example.org/api"
        );
        assert_eq!(dashify_url("not-a-url"), "not-a-url");
    }

    #[test]
    fn default_endpoints_populated() {
        let endpoints = Endpoints::default();
        assert!(endpoints.blockchain.starts_with("https://"));
        assert!(endpoints.cellnode.starts_with("https://"));
    }
}
