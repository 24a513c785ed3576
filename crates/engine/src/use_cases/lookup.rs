//! Resolution of selected option tokens into lookup table ids.

use std::sync::Arc;

use storykin_domain::catalog::is_presentation_only;
use storykin_domain::selection::dedup_capped;
use storykin_domain::{LookupId, SelectionCategory};

use crate::infrastructure::ports::{LookupRepo, LookupTable, RepoError};

/// Catalog labels to query for a category's selection.
///
/// Dedups in first-occurrence order and truncates to the category cap before
/// dropping presentation-only tokens (`other*`, `nothing`), so a custom slot
/// still consumes one of the capped positions.
pub fn resolvable_labels<S: AsRef<str>>(
    category: SelectionCategory,
    tokens: &[S],
) -> Vec<&'static str> {
    let catalog = category.catalog();
    dedup_capped(tokens, category.cap())
        .into_iter()
        .filter(|token| !is_presentation_only(token))
        .filter_map(|token| {
            let label = catalog.label_for(&token);
            if label.is_none() {
                tracing::debug!(category = %category, token = %token, "Dropping unknown option token");
            }
            label
        })
        .collect()
}

/// Resolves a category's tokens to store ids.
pub struct LookupResolver {
    lookups: Arc<dyn LookupRepo>,
}

impl LookupResolver {
    pub fn new(lookups: Arc<dyn LookupRepo>) -> Self {
        Self { lookups }
    }

    /// Ids for the selected tokens, in selection order.
    ///
    /// Labels with no matching row are skipped; only store failures are errors.
    pub async fn resolve<S: AsRef<str> + Sync>(
        &self,
        category: SelectionCategory,
        tokens: &[S],
    ) -> Result<Vec<LookupId>, RepoError> {
        let labels = resolvable_labels(category, tokens);
        if labels.is_empty() {
            return Ok(Vec::new());
        }

        let table = LookupTable::from(category);
        let rows = self
            .lookups
            .find_by_labels(table, labels.iter().map(|l| l.to_string()).collect())
            .await?;

        let ids = labels
            .iter()
            .filter_map(|label| {
                let row = rows.iter().find(|row| row.label == *label);
                if row.is_none() {
                    tracing::debug!(table = %table, label, "No lookup row for label");
                }
                row.map(|row| row.id)
            })
            .collect();
        Ok(ids)
    }
}
