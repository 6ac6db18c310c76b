//! Compiled edit rules.
//!
//! A [`RuleSet`] is the executable form of a [`Recipe`]: every pattern is
//! compiled once up front, so a bad regex fails before any file is touched.

use crate::recipe::{Recipe, RuleDefinition};
use regex::Regex;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("rule '{rule}' has an invalid pattern")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
}

/// A single regex substitution with an optional match limit.
#[derive(Debug, Clone)]
pub struct EditRule {
    id: String,
    regex: Regex,
    replacement: String,
    limit: Option<usize>,
}

impl EditRule {
    pub fn new(
        id: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
        limit: Option<usize>,
    ) -> Result<Self, RuleError> {
        let id = id.into();
        let regex = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            rule: id.clone(),
            source,
        })?;
        Ok(Self {
            id,
            regex,
            replacement: replacement.into(),
            limit,
        })
    }

    pub fn from_definition(definition: &RuleDefinition) -> Result<Self, RuleError> {
        Self::new(
            definition.id.as_str(),
            &definition.pattern,
            definition.replacement.as_str(),
            definition.limit,
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Apply the substitution, returning the new text and the number of
    /// matches that were replaced.
    ///
    /// Borrows the input when nothing matched.
    pub fn apply<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let matches = self.regex.find_iter(text);
        let count = match self.limit {
            Some(limit) => matches.take(limit).count(),
            None => matches.count(),
        };
        if count == 0 {
            return (Cow::Borrowed(text), 0);
        }

        // replacen treats a limit of 0 as "replace all"
        let limit = self.limit.unwrap_or(0);
        let replaced = self.regex.replacen(text, limit, self.replacement.as_str());
        (replaced, count)
    }
}

/// The marker guard plus the ordered rules of a recipe.
#[derive(Debug, Clone)]
pub struct RuleSet {
    marker: String,
    rules: Vec<EditRule>,
}

impl RuleSet {
    pub fn new(marker: impl Into<String>, rules: Vec<EditRule>) -> Self {
        Self {
            marker: marker.into(),
            rules,
        }
    }

    pub fn from_recipe(recipe: &Recipe) -> Result<Self, RuleError> {
        let rules = recipe
            .rules
            .iter()
            .map(EditRule::from_definition)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(recipe.meta.marker.as_str(), rules))
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn rules(&self) -> &[EditRule] {
        &self.rules
    }

    /// True when the marker already appears in `text`, meaning no rule may run.
    pub fn is_guarded(&self, text: &str) -> bool {
        text.contains(self.marker.as_str())
    }
}
