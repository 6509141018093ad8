//! # Ledger Transaction Shapes
//!
//! The amino-style JSON structures the chain's REST endpoint accepts:
//! message objects (`{ "type": ..., "value": ... }`), the sign-doc that
//! gets canonicalized and signed, and the broadcast body POSTed to `/txs`.
//!
//! `account_number` and `sequence` travel as strings throughout. The REST
//! API serves them as strings and the signature covers the canonical JSON,
//! so a string/number mismatch between sign-time and broadcast-time would
//! invalidate the signature.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::{BROADCAST_MODE, DEFAULT_FEE_AMOUNT, DEFAULT_GAS, NATIVE_DENOM};
use crate::signing::SignatureObject;

// ---------------------------------------------------------------------------
// Coins & Fees
// ---------------------------------------------------------------------------

/// An amount of a single denomination. Amounts are decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub amount: String,
    pub denom: String,
}

impl Coin {
    /// Build a coin from an integer amount.
    pub fn new(amount: u64, denom: &str) -> Self {
        Self {
            amount: amount.to_string(),
            denom: denom.to_string(),
        }
    }
}

/// Transaction fee: coin amounts plus a gas limit string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub gas: String,
}

impl Default for Fee {
    fn default() -> Self {
        Self {
            amount: vec![Coin::new(DEFAULT_FEE_AMOUNT, NATIVE_DENOM)],
            gas: DEFAULT_GAS.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A typed ledger message: amino type tag plus free-form value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Msg {
    #[serde(rename = "type")]
    pub type_: String,
    pub value: Value,
}

impl Msg {
    /// Generic constructor for message types without a dedicated builder.
    pub fn new(type_: &str, value: Value) -> Self {
        Self {
            type_: type_.to_string(),
            value,
        }
    }

    /// `did/AddDid` — register an agent DID and its verification key.
    pub fn add_did(did: &str, pub_key: &str) -> Self {
        Self::new("did/AddDid", json!({ "did": did, "pubKey": pub_key }))
    }

    /// `cosmos-sdk/MsgSend` — transfer tokens between accounts.
    pub fn send(from_address: &str, to_address: &str, amount: u64, denom: &str) -> Self {
        Self::new(
            "cosmos-sdk/MsgSend",
            json!({
                "amount": [Coin::new(amount, denom)],
                "from_address": from_address,
                "to_address": to_address,
            }),
        )
    }

    /// `cosmos-sdk/MsgDelegate` — stake with a validator.
    pub fn delegate(delegator_address: &str, validator_address: &str, amount: u64) -> Self {
        Self::new(
            "cosmos-sdk/MsgDelegate",
            json!({
                "amount": Coin::new(amount, NATIVE_DENOM),
                "delegator_address": delegator_address,
                "validator_address": validator_address,
            }),
        )
    }

    /// `cosmos-sdk/MsgUndelegate` — unbond from a validator.
    pub fn undelegate(delegator_address: &str, validator_address: &str, amount: u64) -> Self {
        Self::new(
            "cosmos-sdk/MsgUndelegate",
            json!({
                "amount": Coin::new(amount, NATIVE_DENOM),
                "delegator_address": delegator_address,
                "validator_address": validator_address,
            }),
        )
    }

    /// `cosmos-sdk/MsgBeginRedelegate` — move stake between validators.
    pub fn begin_redelegate(
        delegator_address: &str,
        validator_src_address: &str,
        validator_dst_address: &str,
        amount: u64,
    ) -> Self {
        Self::new(
            "cosmos-sdk/MsgBeginRedelegate",
            json!({
                "amount": Coin::new(amount, NATIVE_DENOM),
                "delegator_address": delegator_address,
                "validator_src_address": validator_src_address,
                "validator_dst_address": validator_dst_address,
            }),
        )
    }

    /// `bonds/MsgBuy` — buy into a bonding curve, capped by `max_prices`.
    pub fn buy_bond(buyer_did: &str, bond_did: &str, amount: Coin, max_prices: Vec<Coin>) -> Self {
        Self::new(
            "bonds/MsgBuy",
            json!({
                "buyer_did": buyer_did,
                "bond_did": bond_did,
                "amount": amount,
                "max_prices": max_prices,
            }),
        )
    }

    /// `bonds/MsgSell` — sell out of a bonding curve.
    pub fn sell_bond(seller_did: &str, bond_did: &str, amount: Coin) -> Self {
        Self::new(
            "bonds/MsgSell",
            json!({
                "seller_did": seller_did,
                "bond_did": bond_did,
                "amount": amount,
            }),
        )
    }
}

// ---------------------------------------------------------------------------
// Sign Doc & Broadcast
// ---------------------------------------------------------------------------

/// The document that gets canonicalized and signed for a broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignDoc {
    pub account_number: String,
    pub chain_id: String,
    pub fee: Fee,
    pub memo: String,
    pub msgs: Vec<Msg>,
    pub sequence: String,
}

/// A signature entry in the broadcast body: the envelope signature spread
/// together with the account coordinates it was made for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxSignature {
    #[serde(flatten)]
    pub signature: SignatureObject,
    pub account_number: String,
    pub sequence: String,
}

/// The transaction wrapper inside a broadcast body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tx {
    pub msg: Vec<Msg>,
    pub fee: Fee,
    pub signatures: Vec<TxSignature>,
}

/// The body POSTed to `/txs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastReq {
    pub tx: Tx,
    pub mode: String,
}

impl BroadcastReq {
    /// Assemble a broadcast body from a signed sign-doc.
    pub fn new(sign_doc: SignDoc, signature: SignatureObject) -> Self {
        let SignDoc {
            account_number,
            fee,
            msgs,
            sequence,
            ..
        } = sign_doc;

        Self {
            tx: Tx {
                msg: msgs,
                fee,
                signatures: vec![TxSignature {
                    signature,
                    account_number,
                    sequence,
                }],
            },
            mode: BROADCAST_MODE.to_string(),
        }
    }
}

/// Normalize an account field that may arrive as a JSON string or number.
///
/// The sign doc must carry it as a string either way.
pub fn account_field_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
