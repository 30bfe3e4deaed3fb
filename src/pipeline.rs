//! One-call unfolding: classify, build the bend tree, flatten, assemble.
//!
//! The three stages share a single [`SolidQuery`] over the input solid.
//! Each stage fails fast, so any error aborts the run before later stages
//! start, and the store is never modified.

use tracing::info;

use crate::adapter::SolidQuery;
use crate::error::Result;
use crate::pattern::assemble::AssemblePattern;
use crate::pattern::FlatPattern;
use crate::topology::{SolidId, TopologyStore};
use crate::tree::build::BuildTree;
use crate::unfold::{SheetParams, Unfold};

/// Unfolds `solid` into a flat pattern using `params` for every bend.
///
/// The root flange is chosen automatically; to pick a root or to override
/// material parameters on individual bends, run the stages directly.
///
/// # Errors
///
/// Returns the first stage failure unchanged: face classification, bend
/// tree construction, flattening, or pattern assembly.
pub fn unfold_solid(
    store: &TopologyStore,
    solid: SolidId,
    params: SheetParams,
) -> Result<FlatPattern> {
    let query = SolidQuery::new(store, solid)?;
    let mut tree = BuildTree::new().execute(&query)?;
    Unfold::new(params).execute(&query, &mut tree)?;
    let pattern = AssemblePattern::new().execute(&query, &tree)?;

    info!(
        "unfolded solid into {} outlines and {} bend lines",
        pattern.outlines().len(),
        pattern.bend_lines().len()
    );
    Ok(pattern)
}
