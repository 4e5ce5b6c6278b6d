//! Corpus crawl: turn a directory of HTML pages into a [`LinkGraph`].
//!
//! Every regular file directly inside the corpus directory whose name ends
//! in `.html` is a page. A page's links are the `href` targets of its
//! `<a ...>` tags, minus links to itself and minus targets that are not
//! pages of the corpus.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use linkrank_core::LinkGraph;
use regex::Regex;
use tracing::{debug, instrument};

static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a\s+(?:[^>]*?)href="([^"]*)""#).expect("href pattern is valid")
});

/// Collect the distinct `href` targets of every anchor tag in `html`.
pub fn extract_links(html: &str) -> BTreeSet<String> {
    HREF.captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Read every `.html` page in `dir` and build the in-corpus link graph.
///
/// # Errors
///
/// Returns an error if the directory or a page cannot be read, or if the
/// directory holds no `.html` pages.
#[instrument]
pub fn crawl(dir: &Path) -> Result<LinkGraph> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read corpus {}", dir.display()))?;

    let mut pages: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(".html") {
            continue;
        }

        // Follows symlinks, unlike `DirEntry::file_type`.
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut links = extract_links(&contents);
        links.remove(&name);
        pages.insert(name, links);
    }

    if pages.is_empty() {
        bail!("no .html pages found in {}", dir.display());
    }

    let known: BTreeSet<String> = pages.keys().cloned().collect();
    let mut dropped = 0_usize;
    for links in pages.values_mut() {
        let before = links.len();
        links.retain(|link| known.contains(link));
        dropped += before - links.len();
    }
    debug!(pages = pages.len(), dropped, "crawled corpus");

    LinkGraph::from_adjacency(pages).context("corpus produced an inconsistent link graph")
}
