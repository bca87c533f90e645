//! Report Planner
//!
//! Decides which sizes a report covers and which labels a listing shows.
//!
//! Filtering options:
//! - Requested sizes, intersected with the sizes actually in the store
//! - Regex pattern matching on configuration labels, for listings and for
//!   narrowing a store before a report is built
//!
//! Ordering: sizes ascending, labels in store order, so output is deterministic.

use fluxscale_core::{ConfigLabel, ResultStore, ScaleError};
use regex::Regex;

/// Sizes selected for a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPlan {
    /// Sizes present in the store, ascending
    pub sizes: Vec<u64>,
    /// Requested sizes the store does not contain
    pub missing: Vec<u64>,
}

/// Build the size plan; an empty request selects every size
pub fn build_plan(store: &ResultStore, requested: &[u64]) -> ReportPlan {
    if requested.is_empty() {
        return ReportPlan {
            sizes: store.sizes(),
            missing: Vec::new(),
        };
    }

    let mut requested = requested.to_vec();
    requested.sort_unstable();
    requested.dedup();

    let (sizes, missing): (Vec<u64>, Vec<u64>) =
        requested.into_iter().partition(|&s| store.contains(s));
    ReportPlan { sizes, missing }
}

/// Keep labels whose display form matches `filter`
pub fn filter_labels<'a>(
    labels: impl IntoIterator<Item = &'a ConfigLabel>,
    filter: Option<&Regex>,
) -> Vec<&'a ConfigLabel> {
    labels
        .into_iter()
        .filter(|label| filter.is_none_or(|re| re.is_match(&label.to_string())))
        .collect()
}

/// Store restricted to the parallel configurations matching `filter`
///
/// Baselines are always kept since every speedup is taken against them.
pub fn filter_store(store: &ResultStore, filter: &Regex) -> Result<ResultStore, ScaleError> {
    let filtered = ResultStore::load(
        store
            .iter()
            .filter(|m| m.config.is_sequential() || filter.is_match(&m.config.to_string())),
    )?;
    tracing::debug!(
        pattern = filter.as_str(),
        kept = filtered.len(),
        total = store.len(),
        "filtered configurations"
    );
    Ok(filtered)
}
