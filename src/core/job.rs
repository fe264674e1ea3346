use serde::{Deserialize, Serialize};

/* ============================== Ingestion jobs ============================== */

/// The repository half of a job handed to the ingestion agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDetails {
    pub name: String,
    pub full_name: String,
    pub files_path: Vec<String>,
    pub repository_url: String,
    pub branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IngestionStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

/// Agent state shared with the external ingestion runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionJob {
    pub repo: Option<RepositoryDetails>,
    pub error: Option<String>,
    pub status: IngestionStatus,
    pub total_files: usize,
    pub files_ingested: usize,
}

impl IngestionJob {
    #[must_use]
    pub fn pending(repo: RepositoryDetails) -> Self {
        Self {
            total_files: repo.files_path.len(),
            repo: Some(repo),
            error: None,
            status: IngestionStatus::Pending,
            files_ingested: 0,
        }
    }
}
