//! # Bonding Curves
//!
//! Queries and trades against bonding-curve tokens. Bond trades are signed
//! with the *agent* key — bond messages carry DIDs, not account addresses,
//! so the chain resolves the signer through its DID record.

use serde_json::Value;

use crate::client::Client;
use crate::error::Error;
use crate::signing::SigningError;
use crate::tx::{Coin, Fee, Msg};
use crate::wallet::SignerRole;

impl Client {
    /// Fetch one bond by its DID.
    pub async fn get_bond(&self, bond_did: &str) -> Result<Value, Error> {
        self.bc_get(&format!("/bonds/{bond_did}"), None).await
    }

    /// List all bonds with details.
    pub async fn list_bonds(&self) -> Result<Value, Error> {
        self.bc_get("/bonds_detailed", None).await
    }

    /// The current buy price for one unit of a bond's token.
    pub async fn get_bond_price(&self, bond_did: &str) -> Result<Value, Error> {
        self.bc_get(&format!("/bonds/{bond_did}/buy_price/1"), None)
            .await
    }

    /// Buy into a bond, capped at `max_price` of the reserve token.
    pub async fn buy_bond(
        &self,
        bond_did: &str,
        bond_token: &str,
        reserve_token: &str,
        amount: u64,
        max_price: u64,
    ) -> Result<Value, Error> {
        let wallet = self
            .wallet()
            .ok_or_else(|| SigningError::UnknownSigner("agent".into()))?;
        let msg = Msg::buy_bond(
            wallet.did(),
            bond_did,
            Coin::new(amount, bond_token),
            vec![Coin::new(max_price, reserve_token)],
        );
        self.sign_and_broadcast(SignerRole::Agent, msg, Fee::default(), "")
            .await
    }

    /// Sell out of a bond.
    pub async fn sell_bond(
        &self,
        bond_did: &str,
        bond_token: &str,
        amount: u64,
    ) -> Result<Value, Error> {
        let wallet = self
            .wallet()
            .ok_or_else(|| SigningError::UnknownSigner("agent".into()))?;
        let msg = Msg::sell_bond(wallet.did(), bond_did, Coin::new(amount, bond_token));
        self.sign_and_broadcast(SignerRole::Agent, msg, Fee::default(), "")
            .await
    }
}
