//! Emitter configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EmitError, EmitResult};

/// How composite gates are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeStyle {
    /// Expand each composite into its body statements.
    #[default]
    Inline,
    /// Declare each distinct composite once as a `gate` and call it.
    Declare,
}

/// Configuration for [`crate::emit_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitOptions {
    /// Version written in the `OPENQASM` header.
    pub version: String,
    /// Files included after the header, in order.
    pub includes: Vec<String>,
    /// Composite gate style.
    pub composites: CompositeStyle,
    /// Lower `u3` and `cx` to the built-in `U` and `CX` forms.
    pub primitives: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            version: "2.0".into(),
            includes: vec!["qelib1.inc".into()],
            composites: CompositeStyle::Inline,
            primitives: false,
        }
    }
}

impl EmitOptions {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Replace the include list.
    pub fn with_includes<I, S>(mut self, includes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes = includes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the composite gate style.
    pub fn with_composites(mut self, style: CompositeStyle) -> Self {
        self.composites = style;
        self
    }

    /// Enable or disable lowering to built-in primitives.
    pub fn with_primitives(mut self, primitives: bool) -> Self {
        self.primitives = primitives;
        self
    }

    /// Check that every field can be written out.
    pub fn validate(&self) -> EmitResult<()> {
        if self.version.is_empty() || self.version.contains(char::is_whitespace) {
            return Err(EmitError::InvalidOptions(format!(
                "version '{}' is not a single token",
                self.version
            )));
        }
        if let Some(path) = self
            .includes
            .iter()
            .find(|p| p.is_empty() || p.contains('"') || p.contains('\n'))
        {
            return Err(EmitError::InvalidOptions(format!(
                "include path {path:?} cannot be quoted"
            )));
        }
        Ok(())
    }
}
