pub mod loader;
pub mod schema;

pub use loader::{builtin, load_from_path, load_from_str, ConfigError, RecipeOrigin};
pub use schema::{
    Metadata, Recipe, RuleDefinition, ValidationError, ValidationIssue, DEFAULT_EXTENSIONS,
};
