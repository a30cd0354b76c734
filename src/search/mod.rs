//! Template classification by gated value-channel correlation.
//!
//! Every candidate is scored against every key template in the bank; the
//! single best template wins when its score strictly exceeds the configured
//! threshold. Candidates below the threshold are left out of the result.

use crate::bank::TemplateBank;
use crate::image::Image;
use crate::kernel::correlate;
use crate::trace::{trace_event, trace_span};
use std::collections::BTreeMap;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Configuration for a classification pass.
#[derive(Clone, Debug)]
pub struct ClassifyConfig {
    /// Scores must be strictly greater than this to be assigned.
    ///
    /// Only positive scores can ever win, so a negative threshold behaves
    /// like `0.0`.
    pub threshold: f32,
    /// Fan candidates out across threads (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            threshold: 0.9,
            parallel: false,
        }
    }
}

/// Winning template for one candidate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    /// Name of the best-matching key template.
    pub template: String,
    /// Gated correlation score of that template.
    pub score: f32,
}

/// Candidate id to template assignments, ordered by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
    assignments: BTreeMap<String, Assignment>,
}

impl Classification {
    /// Returns the number of assigned candidates.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns true when no candidate was assigned.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Returns the assignment for a candidate id.
    pub fn get(&self, id: &str) -> Option<&Assignment> {
        self.assignments.get(id)
    }

    /// Returns the template name assigned to a candidate id.
    pub fn template_for(&self, id: &str) -> Option<&str> {
        self.assignments.get(id).map(|a| a.template.as_str())
    }

    /// Iterates `(id, assignment)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Assignment)> {
        self.assignments.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn insert(&mut self, id: String, assignment: Assignment) {
        self.assignments.insert(id, assignment);
    }
}

/// Classifier over a borrowed, read-only template bank.
pub struct Classifier<'a> {
    bank: &'a TemplateBank,
    cfg: ClassifyConfig,
}

impl<'a> Classifier<'a> {
    /// Creates a classifier with default configuration.
    pub fn new(bank: &'a TemplateBank) -> Self {
        Self {
            bank,
            cfg: ClassifyConfig::default(),
        }
    }

    /// Replaces the classification configuration.
    pub fn with_config(mut self, cfg: ClassifyConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ClassifyConfig {
        &self.cfg
    }

    /// Returns the highest-scoring template regardless of threshold.
    ///
    /// Ties keep the earliest template in bank order. `None` when no template
    /// scores above zero.
    pub fn best_template(&self, candidate: &Image) -> Option<Assignment> {
        let sample = candidate.sample();
        let mut best: Option<(f32, &str)> = None;
        for tpl in self.bank.iter() {
            let score = correlate(tpl.image().sample(), sample);
            let current = best.map_or(0.0, |(s, _)| s);
            if score > current {
                best = Some((score, tpl.name()));
            }
        }
        best.map(|(score, name)| Assignment {
            template: name.to_string(),
            score,
        })
    }

    /// Returns the best template when its score exceeds the threshold.
    pub fn best_match(&self, candidate: &Image) -> Option<Assignment> {
        self.best_template(candidate)
            .filter(|a| a.score > self.cfg.threshold)
    }

    /// Classifies a set of `(id, image)` candidates.
    pub fn classify<'c, I, S>(&self, candidates: I) -> Classification
    where
        I: IntoIterator<Item = (S, &'c Image)>,
        S: Into<String>,
    {
        let items: Vec<(String, &Image)> = candidates
            .into_iter()
            .map(|(id, img)| (id.into(), img))
            .collect();
        let _span = trace_span!(
            "classify",
            candidates = items.len(),
            templates = self.bank.len(),
            parallel = self.cfg.parallel
        )
        .entered();

        let scored = self.score_all(&items);
        let mut out = Classification::default();
        for (id, assignment) in items.into_iter().map(|(id, _)| id).zip(scored) {
            if let Some(assignment) = assignment {
                out.insert(id, assignment);
            }
        }

        trace_event!("classify_assigned", count = out.len());
        out
    }

    fn score_all(&self, items: &[(String, &Image)]) -> Vec<Option<Assignment>> {
        #[cfg(feature = "rayon")]
        {
            if self.cfg.parallel {
                return items
                    .par_iter()
                    .map(|(_, img)| self.best_match(img))
                    .collect();
            }
        }
        items.iter().map(|(_, img)| self.best_match(img)).collect()
    }
}
