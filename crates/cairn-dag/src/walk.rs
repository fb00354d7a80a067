//! Bounded child enumeration.
//!
//! [`enumerate_children`] walks a DAG depth-first from a root, in link order,
//! using an explicit work stack so stack usage does not grow with graph
//! depth.
//!
//! # Semantics
//!
//! - The root is expanded but not visited; callers record it themselves.
//! - Children of a node at depth `d` are visited at depth `d + 1`.
//! - A node is expanded only if the visitor accepted it and
//!   [`MaxDepth::allows_expansion`] holds for its depth.
//! - The first link-source error aborts the walk. Identifiers already
//!   handed to the visitor stay handed over.

use async_trait::async_trait;
use tracing::debug;

use cairn_types::cancel::check as check_cancelled;
use cairn_types::{or_cancel, CancellationToken, Cid};

use crate::depth::MaxDepth;
use crate::error::DagResult;
use crate::links::LinkSource;
use crate::set::CidSet;

/// Decides whether a discovered identifier is expanded.
///
/// Return `Ok(false)` for identifiers already seen; the walker then skips
/// their sub-DAG. An error aborts the walk.
#[async_trait]
pub trait Visitor: Send {
    async fn visit(&mut self, cid: Cid, depth: u32) -> DagResult<bool>;
}

#[async_trait]
impl Visitor for CidSet {
    async fn visit(&mut self, cid: Cid, _depth: u32) -> DagResult<bool> {
        Ok(CidSet::visit(self, cid))
    }
}

/// Counters for one walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Nodes whose links were fetched (the root included).
    pub expanded: u64,
    /// Identifiers the visitor accepted.
    pub visited: u64,
    /// Identifiers the visitor rejected as already seen.
    pub pruned: u64,
}

/// Enumerate the identifiers reachable from `root`, feeding each to `visitor`.
pub async fn enumerate_children(
    cancel: &CancellationToken,
    links: &dyn LinkSource,
    root: Cid,
    max_depth: MaxDepth,
    visitor: &mut dyn Visitor,
) -> DagResult<()> {
    enumerate_children_with_stats(cancel, links, root, max_depth, visitor)
        .await
        .map(|_| ())
}

/// [`enumerate_children`], also reporting what the walk did.
pub async fn enumerate_children_with_stats(
    cancel: &CancellationToken,
    links: &dyn LinkSource,
    root: Cid,
    max_depth: MaxDepth,
    visitor: &mut dyn Visitor,
) -> DagResult<WalkStats> {
    let mut stats = WalkStats::default();
    let mut stack: Vec<(Cid, u32)> = vec![(root, 0)];

    while let Some((cid, depth)) = stack.pop() {
        check_cancelled(cancel)?;

        if depth > 0 {
            if !visitor.visit(cid, depth).await? {
                stats.pruned += 1;
                continue;
            }
            stats.visited += 1;
        }

        if !max_depth.allows_expansion(depth) {
            continue;
        }

        let children = or_cancel(cancel, links.get_links(&cid)).await??;
        stats.expanded += 1;

        // Reversed so the first link is popped first.
        stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
    }

    debug!(
        root = %root.short_hex(),
        max_depth = %max_depth,
        expanded = stats.expanded,
        visited = stats.visited,
        pruned = stats.pruned,
        "enumerated children"
    );
    Ok(stats)
}
