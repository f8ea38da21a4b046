//! Greedy index selection
//!
//! Submodular-style covering over the benefit matrix: each round picks the
//! candidate with the largest total benefit across the workload, then
//! re-credits every query row against the best already-chosen index so that
//! further picks are paid only their marginal improvement. Stops when the
//! best total is non-positive or the cap is reached.
//!
//! The base matrix is kept immutable; rounds mutate a working copy plus an
//! eligibility bitmap over columns. Ties on the total go to the first
//! candidate in column order, which the candidate set guarantees is stable,
//! so runs are reproducible.

use crate::candidates::IndexCandidate;
use crate::scorer::BenefitMatrix;

/// One selected index and the round total that won it
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// The chosen index
    pub index: IndexCandidate,
    /// Sum of the working matrix's column at selection time
    pub benefit: f64,
}

/// Greedy selector over a scored benefit matrix
pub struct GreedySelector {
    base: BenefitMatrix,
    max_indexes: usize,
}

impl GreedySelector {
    /// Creates a selector; `max_indexes` of zero means unlimited
    pub fn new(base: BenefitMatrix, max_indexes: usize) -> Self {
        Self { base, max_indexes }
    }

    /// Runs selection to completion.
    ///
    /// `candidates` must be the column order the matrix was built with.
    pub fn select(self, candidates: &[IndexCandidate]) -> Vec<Selection> {
        debug_assert_eq!(self.base.cols(), candidates.len());

        let mut working = self.base.clone();
        let mut eligible = vec![true; self.base.cols()];
        let mut chosen: Vec<usize> = Vec::new();
        let mut selections: Vec<Selection> = Vec::new();

        loop {
            // Best column by working total, first wins ties
            let mut best: Option<(usize, f64)> = None;
            for col in 0..working.cols() {
                if !eligible[col] {
                    continue;
                }
                let total = working.column_total(col);
                if best.map_or(true, |(_, best_total)| total > best_total) {
                    best = Some((col, total));
                }
            }

            let Some((winner, total)) = best else {
                break;
            };
            if total <= 0.0 {
                break;
            }

            eligible[winner] = false;
            chosen.push(winner);
            selections.push(Selection {
                index: candidates[winner].clone(),
                benefit: total,
            });

            if self.max_indexes > 0 && selections.len() == self.max_indexes {
                break;
            }

            self.recredit(&mut working, &eligible, &chosen);
        }

        selections
    }

    /// Re-credits each row against the best base score among chosen indexes
    /// that can serve it, flooring marginals at zero.
    fn recredit(&self, working: &mut BenefitMatrix, eligible: &[bool], chosen: &[usize]) {
        for row in 0..self.base.rows() {
            let mut best: Option<f64> = None;
            for &col in chosen {
                let score = self.base.get(row, col);
                if score != 0.0 {
                    best = Some(best.map_or(score, |current: f64| current.max(score)));
                }
            }

            // No chosen index serves this row; its credits stand
            let Some(best) = best else {
                continue;
            };

            for col in 0..working.cols() {
                if eligible[col] {
                    let marginal = (self.base.get(row, col) - best).max(0.0);
                    working.set(row, col, marginal);
                }
            }
        }
    }
}
