//! Execution request model
//!
//! The input to `StreamClient::execute`: which analysis template to run,
//! its parameters, optional logical-to-physical resource bindings, and
//! optional compute constraints. Serializes camelCase to match the wire
//! (`templateId`, `ramGb`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::TemplateId;

/// Compute resource constraints for an execution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequest {
    /// CPU count
    pub cpu: u32,
    /// Memory in GB
    pub ram_gb: u32,
    /// Accelerator flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuda: Option<bool>,
}

impl ResourceRequest {
    pub fn new(cpu: u32, ram_gb: u32) -> Self {
        Self {
            cpu,
            ram_gb,
            cuda: None,
        }
    }

    /// Request an accelerator
    pub fn with_cuda(mut self) -> Self {
        self.cuda = Some(true);
        self
    }
}

/// A unit of work handed to a stream client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    /// Which analysis template to run
    pub template_id: TemplateId,
    /// Template parameter values by name
    #[serde(default)]
    pub params: Map<String, Value>,
    /// Logical-to-physical resource bindings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<BTreeMap<String, String>>,
    /// Compute constraints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequest>,
}

impl ExecuteRequest {
    /// Create a request with empty params
    pub fn new(template_id: TemplateId) -> Self {
        Self {
            template_id,
            params: Map::new(),
            binding: None,
            resources: None,
        }
    }

    /// Set one parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Bind a logical resource name to a physical one
    pub fn with_binding(mut self, logical: impl Into<String>, physical: impl Into<String>) -> Self {
        self.binding
            .get_or_insert_with(BTreeMap::new)
            .insert(logical.into(), physical.into());
        self
    }

    /// Set compute constraints
    pub fn with_resources(mut self, resources: ResourceRequest) -> Self {
        self.resources = Some(resources);
        self
    }
}
