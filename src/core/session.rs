use crate::{
    Error, Result,
    core::{
        DisplayState, FeatureFlags, FileNode, IngestionJob, RepositoryDetails, Selection, Toggle,
        at_limit, build_tree, find_node, node_display_state, select_from_text, toggle_leaf,
        toggle_subtree,
    },
};
use chrono::{DateTime, Local};
use tracing::{debug, info};

pub const DEFAULT_BRANCH: &str = "main";

/// Proof that a path-list load was started. Only the most recently issued
/// ticket can complete; it is consumed on use.
#[derive(Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// State of one file picker: the current path list, its tree, and the
/// selection made against it.
#[derive(Debug, Default)]
pub struct PickerSession {
    paths: Vec<String>,
    tree: Vec<FileNode>,
    selection: Selection,
    limit: Option<usize>,
    branch: Option<String>,
    load_seq: u64,
    last_refresh: Option<DateTime<Local>>,
}

impl PickerSession {
    #[must_use]
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn from_flags(flags: &FeatureFlags) -> Self {
        Self::new(flags.max_files_limit)
    }

    /* ------------------------------- Loading ------------------------------- */

    fn issue_ticket(&mut self) -> LoadTicket {
        self.load_seq += 1;
        self.paths.clear();
        self.tree.clear();
        self.selection = Selection::new();
        LoadTicket(self.load_seq)
    }

    /// Start loading the file list of `branch`. Everything derived from the
    /// previous list is dropped now, before the fetch completes.
    pub fn begin_load(&mut self, branch: impl Into<String>) -> LoadTicket {
        self.branch = Some(branch.into());
        self.issue_ticket()
    }

    /// Apply a fetched path list. Returns `false` and changes nothing when a
    /// newer load has been started since `ticket` was issued.
    pub fn finish_load(&mut self, ticket: LoadTicket, paths: Vec<String>) -> bool {
        if ticket.0 != self.load_seq {
            debug!(
                ticket = ticket.0,
                latest = self.load_seq,
                "discarding stale path list"
            );
            return false;
        }

        self.tree = build_tree(&paths);
        self.paths = paths;
        self.selection = Selection::new();
        self.last_refresh = Some(Local::now());
        info!(
            branch = self.branch.as_deref().unwrap_or(DEFAULT_BRANCH),
            files = self.paths.len(),
            "path list loaded"
        );
        true
    }

    /// Load `paths` immediately on the current branch.
    pub fn replace_paths(&mut self, paths: Vec<String>) {
        let ticket = self.issue_ticket();
        let applied = self.finish_load(ticket, paths);
        debug_assert!(applied);
    }

    /* ------------------------------ Selection ------------------------------ */

    fn apply(&mut self, outcome: Toggle) -> bool {
        let reached = outcome.limit_reached();
        self.selection = outcome.into_selection();
        reached
    }

    /// Select or deselect the node at `path`: a single file, or every file
    /// under a directory. Returns `true` when the limit blocked the change.
    pub fn toggle(&mut self, path: &str, selected: bool) -> bool {
        let Some(node) = find_node(&self.tree, path) else {
            debug!(path, "toggle on unknown path ignored");
            return false;
        };
        let outcome = if node.is_dir {
            toggle_subtree(node, selected, &self.selection, self.limit)
        } else {
            toggle_leaf(&node.path, selected, &self.selection, self.limit)
        };
        self.apply(outcome)
    }

    /// Checkbox click: a fully selected node is cleared, anything else is
    /// selected.
    pub fn click(&mut self, path: &str) -> bool {
        let select = self.display_state(path) != Some(DisplayState::Full);
        self.toggle(path, select)
    }

    /// Replace the selection with the files named in a pasted hierarchy.
    pub fn apply_text_selection(&mut self, text: &str) -> bool {
        let outcome = select_from_text(&self.tree, text, &self.selection, self.limit);
        self.apply(outcome)
    }

    /// Change the limit. Entries already selected stay selected.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
    }

    /* ------------------------------- Queries ------------------------------- */

    #[must_use]
    pub fn display_state(&self, path: &str) -> Option<DisplayState> {
        find_node(&self.tree, path).map(|n| node_display_state(n, &self.selection))
    }

    #[must_use]
    pub fn selected_paths(&self) -> Vec<String> {
        self.selection.to_vec()
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn at_limit(&self) -> bool {
        at_limit(&self.selection, self.limit)
    }

    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    #[must_use]
    pub fn tree(&self) -> &[FileNode] {
        &self.tree
    }

    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    #[must_use]
    pub fn branch(&self) -> &str {
        self.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    #[must_use]
    pub const fn last_refresh(&self) -> Option<DateTime<Local>> {
        self.last_refresh
    }

    /* -------------------------------- Jobs --------------------------------- */

    /// Package the selection for the ingestion agent.
    pub fn ingestion_job(
        &self,
        owner: &str,
        repo_name: &str,
        repository_url: &str,
        user_email: Option<&str>,
        flags: &FeatureFlags,
    ) -> Result<IngestionJob> {
        if flags.disable_ingestion {
            return Err(Error::IngestionDisabled);
        }
        if self.selection.is_empty() {
            return Err(Error::EmptySelection);
        }

        Ok(IngestionJob::pending(RepositoryDetails {
            name: repo_name.to_string(),
            full_name: format!("{owner}/{repo_name}"),
            files_path: self.selected_paths(),
            repository_url: repository_url.to_string(),
            branch: self.branch().to_string(),
            user_email: user_email.map(str::to_string),
        }))
    }
}
