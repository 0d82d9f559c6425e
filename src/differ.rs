//! # Archive Differ
//!
//! Checks that every entry of a reference archive has an identical counterpart in a
//! candidate archive. The check is one-directional: entries that exist only in the
//! candidate are ignored. The first failure ends the run.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::archive::{EntryDescriptor, EntrySource, ZipArchiveHandle};
use crate::compare::compare_entries;
use crate::error::DiffError;

/// What a successful diff looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffSummary {
    /// Reference entries that were matched and verified.
    pub entries_verified: usize,
    /// Distinct candidate names with no counterpart in the reference. Never an error.
    pub candidate_only: usize,
}

/// Maps each raw name to the position of its first occurrence.
fn index_by_name(entries: &[EntryDescriptor]) -> HashMap<Vec<u8>, usize> {
    let mut index = HashMap::with_capacity(entries.len());
    for (position, entry) in entries.iter().enumerate() {
        index.entry(entry.raw_name.clone()).or_insert(position);
    }
    index
}

/// Compares `reference` against `candidate`, entry by entry, in the reference's
/// stored order.
pub fn diff<A, B>(reference: &mut A, candidate: &mut B) -> Result<DiffSummary, DiffError>
where
    A: EntrySource + ?Sized,
    B: EntrySource + ?Sized,
{
    let by_name = index_by_name(candidate.entries());
    let mut matched = vec![false; candidate.entries().len()];

    for reference_index in 0..reference.entries().len() {
        let entry = &reference.entries()[reference_index];
        let name = entry.name.clone();
        let Some(&candidate_index) = by_name.get(&entry.raw_name) else {
            return Err(DiffError::MissingEntry { name });
        };

        debug!(%name, reference_index, candidate_index, "comparing entry");
        compare_entries(reference, reference_index, candidate, candidate_index)
            .map_err(|mismatch| DiffError::entry(name, mismatch))?;
        matched[candidate_index] = true;
    }

    Ok(DiffSummary {
        entries_verified: reference.entries().len(),
        // Only first occurrences can be matched; later duplicates share their name.
        candidate_only: by_name.values().filter(|&&i| !matched[i]).count(),
    })
}

/// Opens both archives and diffs them. Both are closed on return, whatever the
/// outcome.
pub fn diff_paths(reference: &Path, candidate: &Path) -> Result<DiffSummary, DiffError> {
    let mut reference_archive = ZipArchiveHandle::open(reference)?;
    let mut candidate_archive = ZipArchiveHandle::open(candidate)?;

    let summary = diff(&mut reference_archive, &mut candidate_archive)?;
    info!(
        reference = %reference.display(),
        candidate = %candidate.display(),
        verified = summary.entries_verified,
        ignored = summary.candidate_only,
        "archives match"
    );
    Ok(summary)
}
