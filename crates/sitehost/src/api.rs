//! Request and response bodies of the site operations.

use serde::{Deserialize, Serialize};
use sitehost_registry::{SiteId, SiteSummary};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateSite {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreatedSite {
    pub id: SiteId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SiteList {
    pub sites: Vec<SiteSummary>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RepoDeploy {
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
    #[serde(default)]
    pub subdir: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployStatus {
    Deployed,
}

/// Where a repository deploy came from. Absent `ref`/`subdir` serialize as `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeploySource {
    pub repo: String,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub subdir: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Deployed {
    pub status: DeployStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<DeploySource>,
    /// Non-fatal problems, such as previous content that could not be deleted.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upload_response_is_status_only() {
        let deployed = Deployed {
            status: DeployStatus::Deployed,
            source: None,
            warnings: Vec::new(),
        };
        assert_eq!(serde_json::to_value(&deployed).unwrap(), json!({ "status": "deployed" }));
    }

    #[test]
    fn repository_response_echoes_nulls() {
        let deployed = Deployed {
            status: DeployStatus::Deployed,
            source: Some(DeploySource {
                repo: "owner/repo".into(),
                reference: None,
                subdir: None,
            }),
            warnings: Vec::new(),
        };
        assert_eq!(
            serde_json::to_value(&deployed).unwrap(),
            json!({
                "status": "deployed",
                "source": { "repo": "owner/repo", "ref": null, "subdir": null }
            })
        );
    }

    #[test]
    fn repo_deploy_reads_ref_field() {
        let request: RepoDeploy =
            serde_json::from_value(json!({ "repo": "o/r", "ref": "main" })).unwrap();
        assert_eq!(request.reference.as_deref(), Some("main"));
        assert!(request.subdir.is_none());
    }
}
