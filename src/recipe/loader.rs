//! Recipe loading.
//!
//! Every recipe, bundled or user supplied, goes through [`parse`]: TOML
//! deserialization followed by [`Recipe::validate`]. Errors name where the
//! recipe came from so a bad `--recipe` file and a broken bundled recipe are
//! told apart in the report.

use crate::recipe::schema::{Recipe, ValidationError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

const BUILTIN_RECIPE: &str = include_str!("../../recipes/mui-use-theme.toml");

/// Where a recipe's text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeOrigin {
    /// `recipes/mui-use-theme.toml`, compiled into the binary
    Builtin,
    /// A string handed to [`load_from_str`]
    Inline,
    File(PathBuf),
}

impl fmt::Display for RecipeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeOrigin::Builtin => write!(f, "built-in recipe"),
            RecipeOrigin::Inline => write!(f, "inline recipe"),
            RecipeOrigin::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read recipe {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {origin} as TOML")]
    Toml {
        origin: RecipeOrigin,
        #[source]
        source: toml_edit::de::Error,
    },

    #[error("invalid {origin}")]
    Validation {
        origin: RecipeOrigin,
        #[source]
        source: ValidationError,
    },
}

fn parse(input: &str, origin: RecipeOrigin) -> Result<Recipe, ConfigError> {
    let recipe: Recipe = match toml_edit::de::from_str(input) {
        Ok(recipe) => recipe,
        Err(source) => return Err(ConfigError::Toml { origin, source }),
    };
    match recipe.validate() {
        Ok(()) => Ok(recipe),
        Err(source) => Err(ConfigError::Validation { origin, source }),
    }
}

impl FromStr for Recipe {
    type Err = ConfigError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        parse(input, RecipeOrigin::Inline)
    }
}

pub fn load_from_str(input: &str) -> Result<Recipe, ConfigError> {
    input.parse()
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Recipe, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents, RecipeOrigin::File(path.to_path_buf()))
}

/// The recipe bundled with the binary.
pub fn builtin() -> Result<Recipe, ConfigError> {
    parse(BUILTIN_RECIPE, RecipeOrigin::Builtin)
}
