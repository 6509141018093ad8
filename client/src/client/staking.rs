//! # Staking & Distribution
//!
//! Wrappers over the chain's staking and distribution REST endpoints plus
//! the three delegation messages. Queries are plain GETs; mutations go
//! through the shared sign-and-broadcast path with the transaction key.

use serde_json::Value;

use crate::client::Client;
use crate::error::Error;
use crate::signing::SigningError;
use crate::tx::{Fee, Msg};
use crate::wallet::SignerRole;

impl Client {
    /// List validators, with optional REST query parameters (e.g. status,
    /// pagination).
    pub async fn list_validators(
        &self,
        params: Option<&[(String, String)]>,
    ) -> Result<Value, Error> {
        self.bc_get("/staking/validators", params).await
    }

    /// Fetch one validator by operator address.
    pub async fn get_validator(&self, validator_addr: &str) -> Result<Value, Error> {
        self.bc_get(&format!("/staking/validators/{validator_addr}"), None)
            .await
    }

    /// The wallet's own delegations.
    pub async fn my_delegations(&self) -> Result<Value, Error> {
        let wallet = self
            .wallet()
            .ok_or_else(|| SigningError::UnknownSigner("secp".into()))?;
        let address = wallet.account(SignerRole::Secp).address;
        self.bc_get(&format!("/staking/delegators/{address}/delegations"), None)
            .await
    }

    /// The global staking pool.
    pub async fn staking_pool(&self) -> Result<Value, Error> {
        self.bc_get("/staking/pool", None).await
    }

    /// Distribution info for a validator.
    pub async fn validator_distribution(&self, validator_addr: &str) -> Result<Value, Error> {
        self.bc_get(&format!("/distribution/validators/{validator_addr}"), None)
            .await
    }

    /// Rewards accrued by a delegator with one validator.
    pub async fn delegator_validator_rewards(
        &self,
        delegator_addr: &str,
        validator_addr: &str,
    ) -> Result<Value, Error> {
        self.bc_get(
            &format!("/distribution/delegators/{delegator_addr}/rewards/{validator_addr}"),
            None,
        )
        .await
    }

    /// One delegation between a delegator and a validator.
    pub async fn delegation(
        &self,
        delegator_addr: &str,
        validator_addr: &str,
    ) -> Result<Value, Error> {
        self.bc_get(
            &format!("/staking/delegators/{delegator_addr}/delegations/{validator_addr}"),
            None,
        )
        .await
    }

    /// All delegations of a delegator.
    pub async fn delegator_delegations(&self, delegator_addr: &str) -> Result<Value, Error> {
        self.bc_get(
            &format!("/staking/delegators/{delegator_addr}/delegations"),
            None,
        )
        .await
    }

    /// Unbonding delegations of a delegator.
    pub async fn delegator_unbonding_delegations(
        &self,
        delegator_addr: &str,
    ) -> Result<Value, Error> {
        self.bc_get(
            &format!("/staking/delegators/{delegator_addr}/unbonding_delegations"),
            None,
        )
        .await
    }

    /// All rewards accrued by a delegator.
    pub async fn delegator_rewards(&self, delegator_addr: &str) -> Result<Value, Error> {
        self.bc_get(
            &format!("/distribution/delegators/{delegator_addr}/rewards"),
            None,
        )
        .await
    }

    /// Delegate stake to a validator.
    pub async fn delegate(&self, validator_addr: &str, amount: u64) -> Result<Value, Error> {
        let wallet = self
            .wallet()
            .ok_or_else(|| SigningError::UnknownSigner("secp".into()))?;
        let delegator = wallet.account(SignerRole::Secp).address;
        let msg = Msg::delegate(&delegator, validator_addr, amount);
        self.sign_and_broadcast(SignerRole::Secp, msg, Fee::default(), "")
            .await
    }

    /// Unbond stake from a validator.
    pub async fn undelegate(&self, validator_addr: &str, amount: u64) -> Result<Value, Error> {
        let wallet = self
            .wallet()
            .ok_or_else(|| SigningError::UnknownSigner("secp".into()))?;
        let delegator = wallet.account(SignerRole::Secp).address;
        let msg = Msg::undelegate(&delegator, validator_addr, amount);
        self.sign_and_broadcast(SignerRole::Secp, msg, Fee::default(), "")
            .await
    }

    /// Move stake from one validator to another.
    pub async fn redelegate(
        &self,
        validator_src_addr: &str,
        validator_dst_addr: &str,
        amount: u64,
    ) -> Result<Value, Error> {
        let wallet = self
            .wallet()
            .ok_or_else(|| SigningError::UnknownSigner("secp".into()))?;
        let delegator = wallet.account(SignerRole::Secp).address;
        let msg = Msg::begin_redelegate(&delegator, validator_src_addr, validator_dst_addr, amount);
        self.sign_and_broadcast(SignerRole::Secp, msg, Fee::default(), "")
            .await
    }
}
