//! Fan-in of outcomes into a table keyed by target path.

use std::path::Path;

use indexmap::IndexMap;
use indexmap::map::Entry;

use super::TranslationOutcome;
use crate::base::PathKey;
use crate::error::ConvertError;

/// Outcomes of one run keyed by case-insensitive target path.
///
/// Built fresh for every run by [`aggregate`]; keys are unique.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    /// Targeted outcomes (IndexMap preserves arrival order).
    entries: IndexMap<PathKey, TranslationOutcome>,
    /// Outcomes that produced no target path.
    untargeted: Vec<TranslationOutcome>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one outcome, rejecting a second outcome for the same target.
    pub fn insert(&mut self, outcome: TranslationOutcome) -> Result<(), ConvertError> {
        let Some(target) = outcome.target_path.clone() else {
            self.untargeted.push(outcome);
            return Ok(());
        };

        match self.entries.entry(PathKey::new(target)) {
            Entry::Occupied(existing) => Err(ConvertError::ConflictingTarget {
                target: existing.key().path().to_path_buf(),
                first_source: existing.get().source_path.clone(),
                second_source: outcome.source_path,
            }),
            Entry::Vacant(slot) => {
                slot.insert(outcome);
                Ok(())
            }
        }
    }

    pub fn get(&self, target: &Path) -> Option<&TranslationOutcome> {
        self.entries.get(&PathKey::new(target))
    }

    pub fn contains(&self, target: &Path) -> bool {
        self.entries.contains_key(&PathKey::new(target))
    }

    /// Number of targeted outcomes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.untargeted.is_empty()
    }

    /// Targeted outcomes in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&PathKey, &TranslationOutcome)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &PathKey> {
        self.entries.keys()
    }

    /// Outcomes that produced no target path.
    pub fn untargeted(&self) -> &[TranslationOutcome] {
        &self.untargeted
    }

    /// Every outcome, targeted first.
    pub fn outcomes(&self) -> impl Iterator<Item = &TranslationOutcome> {
        self.entries.values().chain(self.untargeted.iter())
    }

    /// Every outcome carrying diagnostics.
    pub fn failures(&self) -> impl Iterator<Item = &TranslationOutcome> {
        self.outcomes().filter(|o| !o.is_success())
    }
}

/// Drain `outcomes` into a [`ResultTable`].
///
/// This is where streaming ends: it blocks until the sequence is exhausted
/// (or ends early through cancellation). Two outcomes for the same target
/// path abort with [`ConvertError::ConflictingTarget`].
pub fn aggregate<I>(outcomes: I) -> Result<ResultTable, ConvertError>
where
    I: IntoIterator<Item = TranslationOutcome>,
{
    let mut table = ResultTable::new();
    for outcome in outcomes {
        if let Err(e) = table.insert(outcome) {
            tracing::warn!("{e}");
            return Err(e);
        }
    }
    tracing::debug!(
        "Aggregated {} targeted and {} untargeted outcome(s)",
        table.len(),
        table.untargeted().len()
    );
    Ok(table)
}
