//! Theme Patcher: recipe-driven regex patching for component sources
//!
//! Reads each target file, runs a short list of regex substitutions over it
//! and writes it back. The built-in recipe imports `useTheme` from
//! `@mui/material` and declares `const theme = useTheme();` at the top of the
//! first `...Props` component in the file.
//!
//! # Guard
//!
//! A recipe names a marker token. If the marker already appears anywhere in a
//! file, no rule runs, which makes a second run over the same file a no-op.
//!
//! # Example
//!
//! ```
//! use theme_patcher::{recipe, Patcher};
//!
//! let patcher = Patcher::from_recipe(&recipe::builtin().unwrap()).unwrap();
//! let patched = patcher.patch_text(
//!     "import { Box } from \"@mui/material\";\n\
//!      export default function Widget({ x }: WidgetProps) {\n  return x;\n}\n",
//! );
//! assert!(patched.content.contains("import { Box, useTheme } from \"@mui/material\";"));
//! assert!(patched.content.contains("  const theme = useTheme();\n"));
//! ```

pub mod discover;
pub mod edit;
pub mod patcher;
pub mod recipe;
pub mod rule;

// Re-exports
pub use discover::expand_targets;
pub use edit::{EditError, WriteMode};
pub use patcher::{PatchError, PatchOutcome, PatchStatus, Patcher, RuleHit, TextPatch};
pub use recipe::{load_from_path, load_from_str, ConfigError, Recipe, ValidationError};
pub use rule::{EditRule, RuleError, RuleSet};
