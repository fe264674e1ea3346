use crate::{Error, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/* ============================ Document filtering ============================ */

/// Which repository paths are offered for ingestion.
///
/// Extensions are stored lowercased with a leading dot. An empty extension
/// set accepts every file.
#[derive(Clone, Debug)]
pub struct DocFilter {
    extensions: BTreeSet<String>,
    skip_dotfiles: bool,
    exclude: Option<Regex>,
}

impl Default for DocFilter {
    fn default() -> Self {
        Self::markdown()
    }
}

impl DocFilter {
    /// `.md` and `.mdx`, no dotfiles.
    #[must_use]
    pub fn markdown() -> Self {
        Self::from_extensions("md, mdx")
    }

    /// Every file, dotfiles included.
    #[must_use]
    pub fn all() -> Self {
        Self {
            extensions: BTreeSet::new(),
            skip_dotfiles: false,
            exclude: None,
        }
    }

    /// Parse a comma-separated extension list such as `"md, .mdx, .TXT"`.
    /// Tokens may carry leading dots; dot-only and empty tokens are ignored.
    #[must_use]
    pub fn from_extensions(raw: &str) -> Self {
        let extensions = raw
            .split(',')
            .map(|tok| tok.trim().trim_start_matches('.'))
            .filter(|tok| !tok.is_empty())
            .map(|tok| format!(".{}", tok.to_lowercase()))
            .collect();
        Self {
            extensions,
            skip_dotfiles: true,
            exclude: None,
        }
    }

    #[must_use]
    pub const fn skip_dotfiles(mut self, skip: bool) -> Self {
        self.skip_dotfiles = skip;
        self
    }

    /// Also drop any path matching `pattern`.
    pub fn with_exclude(mut self, pattern: &str) -> Result<Self> {
        self.exclude = Some(Regex::new(pattern)?);
        Ok(self)
    }

    #[must_use]
    pub const fn skips_dotfiles(&self) -> bool {
        self.skip_dotfiles
    }

    #[must_use]
    pub fn extensions(&self) -> Vec<&str> {
        self.extensions.iter().map(String::as_str).collect()
    }

    /// Dotfile rule only: no segment of `path` may start with `.`.
    #[must_use]
    pub fn is_hidden(path: &str) -> bool {
        path.starts_with('.') || path.contains("/.")
    }

    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        if self.skip_dotfiles && Self::is_hidden(path) {
            return false;
        }
        if let Some(re) = &self.exclude
            && re.is_match(path)
        {
            return false;
        }
        self.matches_extension(path)
    }

    fn matches_extension(&self, path: &str) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let filename = path.rsplit('/').next().unwrap_or(path).to_lowercase();
        // Every dotted suffix, so ".tar.gz" style filters work too.
        filename
            .match_indices('.')
            .any(|(pos, _)| self.extensions.contains(&filename[pos..]))
    }
}

/* =========================== GitHub tree responses ========================== */

#[derive(Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Decode a `git/trees/{branch}?recursive=1` response body into the filtered
/// list of file paths, in response order.
pub fn parse_github_tree(body: &[u8], filter: &DocFilter) -> Result<Vec<String>> {
    let response: TreeResponse = serde_json::from_slice(body).map_err(Error::Json)?;
    if response.truncated {
        warn!(
            entries = response.tree.len(),
            "GitHub tree response is truncated; some files are missing"
        );
    }

    let total = response.tree.len();
    let paths: Vec<String> = response
        .tree
        .into_iter()
        .filter(|e| e.kind.as_deref().is_none_or(|k| k == "blob"))
        .map(|e| e.path)
        .filter(|p| filter.matches(p))
        .collect();

    debug!(total, kept = paths.len(), "filtered GitHub tree");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_filter_is_case_insensitive() {
        let f = DocFilter::markdown();
        assert!(f.matches("docs/README.MD"));
        assert!(f.matches("page.mdx"));
        assert!(!f.matches("notes.markdown"));
        assert!(!f.matches("md"));
    }

    #[test]
    fn hidden_segments_are_skipped() {
        let f = DocFilter::markdown();
        assert!(!f.matches(".github/PULL_REQUEST_TEMPLATE.md"));
        assert!(!f.matches("docs/.drafts/a.md"));
        assert!(f.matches("docs/v1.2/a.md"));
    }

    #[test]
    fn dotfiles_kept_when_asked() {
        let f = DocFilter::markdown().skip_dotfiles(false);
        assert!(f.matches(".github/a.md"));
    }

    #[test]
    fn extension_list_normalizes_tokens() {
        let f = DocFilter::from_extensions(" .MD, ..txt, , ., tar.gz");
        assert_eq!(f.extensions(), vec![".md", ".tar.gz", ".txt"]);
        assert!(f.matches("bundle.tar.gz"));
    }

    #[test]
    fn all_accepts_everything() {
        let f = DocFilter::all();
        assert!(f.matches(".env"));
        assert!(f.matches("src/main.rs"));
    }

    #[test]
    fn exclude_pattern_drops_matches() {
        let f = DocFilter::markdown().with_exclude("^changelog/").unwrap();
        assert!(!f.matches("changelog/v1.md"));
        assert!(f.matches("docs/changelog.md"));
    }

    #[test]
    fn bad_exclude_pattern_is_an_error() {
        assert!(matches!(
            DocFilter::markdown().with_exclude("(unclosed"),
            Err(Error::InvalidPattern(_))
        ));
    }
}
