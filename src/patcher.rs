//! File patcher - applies a rule set to files behind a marker guard
//!
//! Each file goes through the same straight line:
//! - read the full text
//! - skip every rule if the marker is already present
//! - otherwise run the rules in order, each on the previous rule's output
//! - write the (possibly unchanged) text back over the file

use crate::edit::{self, EditError, WriteMode};
use crate::recipe::Recipe;
use crate::rule::{RuleError, RuleSet};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// One rule that fired, and how many substitutions it made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHit {
    pub rule: String,
    pub replacements: usize,
}

/// What happened to a file's content
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "PatchStatus should be checked"]
pub enum PatchStatus {
    /// At least one rule matched and rewrote the content
    Applied { hits: Vec<RuleHit> },
    /// Marker was already present; no rule ran
    AlreadyPatched,
    /// No rule matched
    NoMatch,
}

impl fmt::Display for PatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchStatus::Applied { hits } => {
                write!(f, "applied")?;
                for (idx, hit) in hits.iter().enumerate() {
                    let sep = if idx == 0 { " (" } else { ", " };
                    write!(f, "{sep}{} x{}", hit.rule, hit.replacements)?;
                }
                if !hits.is_empty() {
                    write!(f, ")")?;
                }
                Ok(())
            }
            PatchStatus::AlreadyPatched => write!(f, "already patched"),
            PatchStatus::NoMatch => write!(f, "no match"),
        }
    }
}

/// Result of running the rules over a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPatch {
    pub content: String,
    pub status: PatchStatus,
}

/// Result of patching one file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    pub file: PathBuf,
    pub status: PatchStatus,
    /// Content as read
    pub original: String,
    /// Content as written
    pub patched: String,
}

impl PatchOutcome {
    pub fn changed(&self) -> bool {
        self.original != self.patched
    }
}

#[derive(Error, Debug)]
pub enum PatchError {
    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Edit(#[from] EditError),
}

#[derive(Debug, Clone)]
pub struct Patcher {
    rules: RuleSet,
    write_mode: WriteMode,
}

impl Patcher {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            write_mode: WriteMode::default(),
        }
    }

    /// Compile a recipe into a patcher.
    pub fn from_recipe(recipe: &Recipe) -> Result<Self, PatchError> {
        Ok(Self::new(RuleSet::from_recipe(recipe)?))
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn marker(&self) -> &str {
        self.rules.marker()
    }

    /// Run the guard and the rules over `content` without touching disk.
    pub fn patch_text(&self, content: &str) -> TextPatch {
        if self.rules.is_guarded(content) {
            debug!(marker = self.rules.marker(), "marker present, skipping rules");
            return TextPatch {
                content: content.to_string(),
                status: PatchStatus::AlreadyPatched,
            };
        }

        let mut current = content.to_string();
        let mut hits = Vec::new();

        for rule in self.rules.rules() {
            let (next, replacements) = rule.apply(&current);
            if replacements == 0 {
                debug!(rule = rule.id(), "no match");
                continue;
            }
            debug!(rule = rule.id(), replacements, "rule matched");
            current = next.into_owned();
            hits.push(RuleHit {
                rule: rule.id().to_string(),
                replacements,
            });
        }

        let status = if hits.is_empty() {
            PatchStatus::NoMatch
        } else {
            PatchStatus::Applied { hits }
        };

        TextPatch {
            content: current,
            status,
        }
    }

    /// Patch a single file in place.
    ///
    /// The file is written back even when nothing changed.
    pub fn patch_file(&self, path: impl AsRef<Path>) -> Result<PatchOutcome, PatchError> {
        let path = path.as_ref();
        let original = edit::read_text(path)?;
        let TextPatch { content, status } = self.patch_text(&original);

        edit::write_text(path, &content, self.write_mode)?;
        info!(file = %path.display(), %status, "patched");

        Ok(PatchOutcome {
            file: path.to_path_buf(),
            status,
            original,
            patched: content,
        })
    }

    /// Patch files one after another, in order.
    ///
    /// Stops at the first failure; files before it stay patched and files
    /// after it are not read.
    pub fn patch_files<I, P>(&self, paths: I) -> Result<Vec<PatchOutcome>, PatchError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        paths
            .into_iter()
            .map(|path| self.patch_file(path))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe;
    use crate::rule::EditRule;
    use std::fs;

    fn builtin_patcher() -> Patcher {
        Patcher::from_recipe(&recipe::builtin().unwrap()).unwrap()
    }

    const WIDGET: &str = r#"import { Box } from "@mui/material";
export default function Widget({ x }: WidgetProps) {
  return x;
}
"#;

    const WIDGET_PATCHED: &str = r#"import { Box, useTheme } from "@mui/material";
export default function Widget({ x }: WidgetProps) {
  const theme = useTheme();
  return x;
}
"#;

    #[test]
    fn test_patch_text_example() {
        let result = builtin_patcher().patch_text(WIDGET);
        assert_eq!(result.content, WIDGET_PATCHED);
        assert_eq!(
            result.status,
            PatchStatus::Applied {
                hits: vec![
                    RuleHit {
                        rule: "import-use-theme".to_string(),
                        replacements: 1
                    },
                    RuleHit {
                        rule: "declare-theme".to_string(),
                        replacements: 1
                    },
                ]
            }
        );
    }

    #[test]
    fn test_guard_skips_all_rules() {
        let input = "import { Box, useTheme } from \"@mui/material\";\nfunction A({ a }: AProps) {\n}\n";
        let result = builtin_patcher().patch_text(input);
        assert_eq!(result.content, input);
        assert_eq!(result.status, PatchStatus::AlreadyPatched);
    }

    #[test]
    fn test_marker_anywhere_counts() {
        // Marker in a comment still trips the guard
        let input = "// TODO useTheme\nimport { Box } from \"@mui/material\";\n";
        let result = builtin_patcher().patch_text(input);
        assert_eq!(result.status, PatchStatus::AlreadyPatched);
        assert_eq!(result.content, input);
    }

    #[test]
    fn test_only_first_signature() {
        let input = "function A({ a }: AProps) {\n}\nfunction B({ b }: BProps) {\n}\n";
        let result = builtin_patcher().patch_text(input);
        assert_eq!(
            result.content,
            "function A({ a }: AProps) {\n  const theme = useTheme();\n}\nfunction B({ b }: BProps) {\n}\n"
        );
    }

    #[test]
    fn test_signature_without_trailing_newline_is_not_matched() {
        let input = "function A({ a }: AProps) {";
        let result = builtin_patcher().patch_text(input);
        assert_eq!(result.status, PatchStatus::NoMatch);
        assert_eq!(result.content, input);
    }

    #[test]
    fn test_multiline_destructuring() {
        let input = "export default function Item({\n  a,\n  b,\n}: ItemProps) {\n  return a;\n}\n";
        let result = builtin_patcher().patch_text(input);
        assert_eq!(
            result.content,
            "export default function Item({\n  a,\n  b,\n}: ItemProps) {\n  const theme = useTheme();\n  return a;\n}\n"
        );
    }

    #[test]
    fn test_no_match() {
        let input = "const x = 1;\n";
        let result = builtin_patcher().patch_text(input);
        assert_eq!(result.status, PatchStatus::NoMatch);
        assert_eq!(result.content, input);
    }

    #[test]
    fn test_rules_see_previous_output() {
        let rules = RuleSet::new(
            "done",
            vec![
                EditRule::new("first", "a", "b", None).unwrap(),
                EditRule::new("second", "b", "c", None).unwrap(),
            ],
        );
        let result = Patcher::new(rules).patch_text("a");
        assert_eq!(result.content, "c");
    }

    #[test]
    fn test_patch_file_rewrites_even_when_unchanged() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("plain.tsx");
        fs::write(&file_path, "const x = 1;\n").unwrap();

        let outcome = builtin_patcher().patch_file(&file_path).unwrap();
        assert_eq!(outcome.status, PatchStatus::NoMatch);
        assert!(!outcome.changed());
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "const x = 1;\n");
    }

    #[test]
    fn test_patch_file_atomic() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("Widget.tsx");
        fs::write(&file_path, WIDGET).unwrap();

        let patcher = builtin_patcher().with_write_mode(WriteMode::Atomic);
        let outcome = patcher.patch_file(&file_path).unwrap();
        assert!(outcome.changed());
        assert_eq!(fs::read_to_string(&file_path).unwrap(), WIDGET_PATCHED);
    }

    #[test]
    fn test_patch_files_stops_at_first_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let first = temp_dir.path().join("First.tsx");
        let missing = temp_dir.path().join("Missing.tsx");
        let last = temp_dir.path().join("Last.tsx");
        fs::write(&first, WIDGET).unwrap();
        fs::write(&last, WIDGET).unwrap();

        let result = builtin_patcher().patch_files([&first, &missing, &last]);
        assert!(matches!(result, Err(PatchError::Edit(EditError::Read { .. }))));
        assert_eq!(fs::read_to_string(&first).unwrap(), WIDGET_PATCHED);
        assert_eq!(fs::read_to_string(&last).unwrap(), WIDGET);
    }

    #[test]
    fn test_status_display() {
        let applied = PatchStatus::Applied {
            hits: vec![RuleHit {
                rule: "r".to_string(),
                replacements: 2,
            }],
        };
        assert_eq!(applied.to_string(), "applied (r x2)");
        assert_eq!(PatchStatus::AlreadyPatched.to_string(), "already patched");
        assert_eq!(PatchStatus::NoMatch.to_string(), "no match");
    }
}
