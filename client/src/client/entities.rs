//! # Entities, Projects, Agents, Claims, Files
//!
//! The indexer- and cell-node-facing surface: project records and their
//! documents, per-project agents, claims against claim templates, and
//! public file storage. These are thin wrappers — each builds one request
//! shape and hands it to the shared dispatch in the parent module.

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::client::{CellnodeTarget, Client, CnCall};
use crate::config::{CLAIM_SCHEMA_CONTEXT, DEFAULT_CELLNODE_URL};
use crate::crypto::encoding::from_base64;
use crate::error::Error;
use crate::signing::SigningError;
use crate::wallet::SignerRole;

use super::dashify_url;

/// Media properties on a project record that get dashified when the client
/// is configured for it.
const MEDIA_PROPS: [&str; 2] = ["logo", "image"];

impl Client {
    // -----------------------------------------------------------------------
    // Entity listings (blocksync)
    // -----------------------------------------------------------------------

    /// Fetch one entity record by DID.
    pub async fn get_entity(&self, did: &str) -> Result<Value, Error> {
        self.bs_get(&format!("/api/project/getByProjectDid/{did}"))
            .await
    }

    /// List all entities, optionally filtered by `data.@type`.
    pub async fn list_entities(&self, type_filter: Option<&str>) -> Result<Value, Error> {
        let entities = self.bs_get("/api/project/listProjects").await?;

        let Some(type_filter) = type_filter else {
            return Ok(entities);
        };

        let filtered: Vec<Value> = entities
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter(|e| e["data"]["@type"].as_str() == Some(type_filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(Value::Array(filtered))
    }

    /// List project entities, dashifying media URLs when configured.
    pub async fn list_projects(&self) -> Result<Value, Error> {
        let mut projects = self.list_entities(Some("Project")).await?;
        if self.dashify_urls {
            if let Some(items) = projects.as_array_mut() {
                for record in items {
                    dashify_record_media(record);
                }
            }
        }
        Ok(projects)
    }

    /// List claim-template entities.
    pub async fn list_templates(&self) -> Result<Value, Error> {
        self.list_entities(Some("Template")).await
    }

    /// List cell entities.
    pub async fn list_cells(&self) -> Result<Value, Error> {
        self.list_entities(Some("Cell")).await
    }

    /// Fetch a project record, dashifying media URLs when configured.
    pub async fn get_project(&self, project_did: &str) -> Result<Value, Error> {
        let mut record = self.get_entity(project_did).await?;
        if self.dashify_urls {
            dashify_record_media(&mut record);
        }
        Ok(record)
    }

    /// Fetch a cell record. Identical shape to any other entity.
    pub async fn get_cell(&self, cell_did: &str) -> Result<Value, Error> {
        self.get_entity(cell_did).await
    }

    /// Fetch a claim template, materializing its page content.
    ///
    /// Template records reference their actual claim form by content id;
    /// when `data.page.content` is absent this fetches the file from the
    /// template's cell node, decodes it, and grafts it onto the record
    /// under `data.page.content`.
    pub async fn get_template(&self, template_did: &str) -> Result<Value, Error> {
        let mut record = self.get_entity(template_did).await?;

        if !record["data"]["page"]["content"].is_null() {
            return Ok(record);
        }

        let cid = record["data"]["page"]["cid"]
            .as_str()
            .ok_or_else(|| Error::UnexpectedResponse("template record has no page.cid".into()))?
            .to_string();

        let (file, _) = self
            .cn_rpc(CellnodeTarget::Record(record.clone()), |_, _| CnCall {
                method: "fetchPublic".to_string(),
                template: None,
                data: json!({ "key": cid }),
                is_public: true,
            })
            .await?;

        let raw = file["data"]
            .as_str()
            .ok_or_else(|| Error::UnexpectedResponse("fetched template has no data".into()))?;
        let decoded = from_base64(raw)
            .map_err(|e| Error::UnexpectedResponse(format!("template content: {e}")))?;
        let content: Value = serde_json::from_slice(&decoded)
            .map_err(|e| Error::UnexpectedResponse(format!("template content: {e}")))?;

        record["data"]["page"]["content"] = content;
        Ok(record)
    }

    // -----------------------------------------------------------------------
    // Projects (cell node)
    // -----------------------------------------------------------------------

    /// Create a project document on a cell node.
    pub async fn create_project(
        &self,
        project_data: Value,
        cellnode_url: Option<&str>,
    ) -> Result<Value, Error> {
        let url = cellnode_url.unwrap_or(DEFAULT_CELLNODE_URL).to_string();
        let (result, _) = self
            .cn_rpc(CellnodeTarget::Url(url), |_, _| CnCall {
                method: "createProject".to_string(),
                template: Some("create_project".to_string()),
                data: project_data,
                is_public: false,
            })
            .await?;
        Ok(result)
    }

    /// Update a project document.
    pub async fn update_project(
        &self,
        project_doc_updates: Value,
        cellnode_url: Option<&str>,
    ) -> Result<Value, Error> {
        let url = cellnode_url.unwrap_or(DEFAULT_CELLNODE_URL).to_string();
        let (result, _) = self
            .cn_rpc(CellnodeTarget::Url(url), |_, _| CnCall {
                method: "updateProjectDoc".to_string(),
                template: Some("project_doc".to_string()),
                data: project_doc_updates,
                is_public: false,
            })
            .await?;
        Ok(result)
    }

    /// Update a project's lifecycle status.
    pub async fn update_project_status(
        &self,
        target: CellnodeTarget,
        status: &str,
    ) -> Result<Value, Error> {
        let status = status.to_string();
        let (result, _) = self
            .cn_rpc(target, |project_did, _| CnCall {
                method: "updateProjectStatus".to_string(),
                template: Some("project_status".to_string()),
                data: json!({ "projectDid": project_did, "status": status }),
                is_public: false,
            })
            .await?;
        Ok(result)
    }

    /// The chain-side fund address associated with a project.
    pub async fn get_project_fund_address(&self, project_did: &str) -> Result<Value, Error> {
        let accounts = self
            .bc_get(&format!("/projectAccounts/{project_did}"), None)
            .await?;
        accounts["map"]
            .get(project_did)
            .cloned()
            .ok_or_else(|| Error::UnexpectedResponse("project has no fund account".into()))
    }

    // -----------------------------------------------------------------------
    // Files (cell node, public)
    // -----------------------------------------------------------------------

    /// Upload a `data:` URL to a cell node's public storage.
    ///
    /// Returns the public URL of the stored file.
    pub async fn create_entity_file(
        &self,
        target: CellnodeTarget,
        data_url: &str,
    ) -> Result<String, Error> {
        let (content_type, data) = parse_data_url(data_url)?;

        let (result, endpoint) = self
            .cn_rpc(target, |_, _| CnCall {
                method: "createPublic".to_string(),
                template: None,
                data: json!({ "data": data, "contentType": content_type }),
                is_public: true,
            })
            .await?;

        let key = result
            .as_str()
            .ok_or_else(|| Error::UnexpectedResponse("createPublic returned no key".into()))?;
        Ok(format!("{endpoint}/public/{key}"))
    }

    /// Fetch a file from a cell node's public storage by key.
    pub async fn get_entity_file(
        &self,
        target: CellnodeTarget,
        key: &str,
    ) -> Result<Value, Error> {
        let key = key.to_string();
        let (result, _) = self
            .cn_rpc(target, |_, _| CnCall {
                method: "fetchPublic".to_string(),
                template: None,
                data: json!({ "key": key }),
                is_public: true,
            })
            .await?;
        Ok(result)
    }

    // -----------------------------------------------------------------------
    // Agents (cell node)
    // -----------------------------------------------------------------------

    /// List the agents registered on a project.
    pub async fn list_agents(&self, target: CellnodeTarget) -> Result<Value, Error> {
        let (result, _) = self
            .cn_rpc(target, |project_did, _| CnCall {
                method: "listAgents".to_string(),
                template: Some("list_agent".to_string()),
                data: json!({ "projectDid": project_did }),
                is_public: false,
            })
            .await?;
        Ok(result)
    }

    /// Register an agent on a project.
    pub async fn create_agent(
        &self,
        target: CellnodeTarget,
        agent_did: &str,
        role: &str,
        email: &str,
        name: &str,
    ) -> Result<Value, Error> {
        let (agent_did, role, email, name) = (
            agent_did.to_string(),
            role.to_string(),
            email.to_string(),
            name.to_string(),
        );
        let (result, _) = self
            .cn_rpc(target, move |project_did, _| CnCall {
                method: "createAgent".to_string(),
                template: Some("create_agent".to_string()),
                data: json!({
                    "projectDid": project_did,
                    "agentDid": agent_did,
                    "role": role,
                    "email": email,
                    "name": name,
                }),
                is_public: false,
            })
            .await?;
        Ok(result)
    }

    /// Update an agent's status on a project.
    pub async fn update_agent(
        &self,
        target: CellnodeTarget,
        agent_did: &str,
        status: &str,
        role: &str,
        version: &str,
    ) -> Result<Value, Error> {
        let (agent_did, status, role, version) = (
            agent_did.to_string(),
            status.to_string(),
            role.to_string(),
            version.to_string(),
        );
        let (result, _) = self
            .cn_rpc(target, move |project_did, _| CnCall {
                method: "updateAgentStatus".to_string(),
                template: Some("agent_status".to_string()),
                data: json!({
                    "projectDid": project_did,
                    "agentDid": agent_did,
                    "status": status,
                    "role": role,
                    "version": version,
                }),
                is_public: false,
            })
            .await?;
        Ok(result)
    }

    // -----------------------------------------------------------------------
    // Claims (cell node)
    // -----------------------------------------------------------------------

    /// List claims on a project, optionally narrowed to one template.
    pub async fn list_claims(
        &self,
        target: CellnodeTarget,
        template_id: Option<&str>,
    ) -> Result<Value, Error> {
        let template_id = template_id.map(str::to_string);
        let (result, _) = self
            .cn_rpc(target, move |project_did, _| CnCall {
                method: if template_id.is_some() {
                    "listClaimsByTemplateId".to_string()
                } else {
                    "listClaims".to_string()
                },
                template: Some("list_claim".to_string()),
                data: json!({
                    "projectDid": project_did,
                    "claimTemplateId": template_id,
                }),
                is_public: false,
            })
            .await?;
        Ok(result)
    }

    /// Submit a claim against a template.
    ///
    /// Fetches the template (materializing its content if needed) to pick
    /// up the claim type, then submits the items wrapped in the claim
    /// schema shape.
    pub async fn create_claim(
        &self,
        target: CellnodeTarget,
        template_did: &str,
        claim_items: Value,
    ) -> Result<Value, Error> {
        let wallet = self
            .wallet()
            .ok_or_else(|| Error::from(SigningError::UnknownSigner(SignerRole::Agent.to_string())))?;
        let issuer_did = wallet.did().to_string();

        let template = self.get_template(template_did).await?;
        let claim_template_id = template["projectDid"].clone();
        let claim_type = template["data"]["page"]["content"]["claimInfo"]["type"].clone();
        let date_time = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let (result, _) = self
            .cn_rpc(target, move |project_did, _| CnCall {
                method: "submitClaim".to_string(),
                template: Some("submit_claim".to_string()),
                data: json!({
                    "@context": CLAIM_SCHEMA_CONTEXT,
                    "claimTemplateId": claim_template_id,
                    "type": claim_type,
                    "issuerId": issuer_did,
                    "claimSubject": { "id": project_did },
                    "items": claim_items,
                    "projectDid": project_did,
                    "dateTime": date_time,
                }),
                is_public: false,
            })
            .await?;
        Ok(result)
    }

    /// Record an evaluation verdict on a claim.
    pub async fn evaluate_claim(
        &self,
        target: CellnodeTarget,
        claim_id: &str,
        status: &str,
    ) -> Result<Value, Error> {
        let (claim_id, status) = (claim_id.to_string(), status.to_string());
        let (result, _) = self
            .cn_rpc(target, move |project_did, _| CnCall {
                method: "evaluateClaim".to_string(),
                template: Some("evaluate_claim".to_string()),
                data: json!({
                    "projectDid": project_did,
                    "claimId": claim_id,
                    "status": status,
                }),
                is_public: false,
            })
            .await?;
        Ok(result)
    }

}

/// Rewrite the media URLs on a project record in place.
fn dashify_record_media(record: &mut Value) {
    for prop in MEDIA_PROPS {
        if let Some(url) = record["data"][prop].as_str() {
            record["data"][prop] = Value::String(dashify_url(url));
        }
    }
}

/// Split a `data:<contentType>;base64,<payload>` URL.
fn parse_data_url(data_url: &str) -> Result<(String, String), Error> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| Error::UnexpectedResponse("not a data: URL".into()))?;
    let (content_type, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| Error::UnexpectedResponse("data URL is not base64-encoded".into()))?;
    Ok((content_type.to_string(), payload.to_string()))
}
