/// Convenience result type used across deckimage.
pub type DeckImageResult<T> = Result<T, DeckImageError>;

/// Top-level error taxonomy. Each variant names the pipeline stage that failed.
#[derive(thiserror::Error, Debug)]
pub enum DeckImageError {
    /// Malformed deck record or reference entry.
    #[error("validation error: {0}")]
    Validation(String),

    /// The reference-data source could not provide a document.
    #[error("reference data error: {0}")]
    Reference(String),

    /// Theme tag with no renderer in the lookup table.
    #[error("unknown theme: \"{0}\"")]
    UnknownTheme(String),

    /// A themed renderer or panel renderer failed.
    #[error("render error ({stage}): {message}")]
    Render {
        /// Which part of the composite was being produced.
        stage: String,
        /// Renderer-supplied detail.
        message: String,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeckImageError {
    /// Build a [`DeckImageError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DeckImageError::Reference`] value.
    pub fn reference(msg: impl Into<String>) -> Self {
        Self::Reference(msg.into())
    }

    /// Build a [`DeckImageError::UnknownTheme`] value.
    pub fn unknown_theme(tag: impl Into<String>) -> Self {
        Self::UnknownTheme(tag.into())
    }

    /// Build a [`DeckImageError::Render`] value.
    pub fn render(stage: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Render {
            stage: stage.into(),
            message: msg.into(),
        }
    }

    /// Re-tag a renderer failure with the stage it belongs to. Other variants pass through.
    pub(crate) fn in_stage(self, stage: impl Into<String>) -> Self {
        match self {
            Self::Render { message, .. } => Self::Render {
                stage: stage.into(),
                message,
            },
            Self::Other(e) => Self::Render {
                stage: stage.into(),
                message: format!("{e:#}"),
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            DeckImageError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            DeckImageError::reference("x")
                .to_string()
                .contains("reference data error:")
        );
        assert!(
            DeckImageError::unknown_theme("nonexistent")
                .to_string()
                .contains("unknown theme: \"nonexistent\"")
        );
    }

    #[test]
    fn render_errors_name_their_stage() {
        let err = DeckImageError::render("fleet #2", "boom");
        assert_eq!(err.to_string(), "render error (fleet #2): boom");

        let err = DeckImageError::Other(anyhow::anyhow!("disk full")).in_stage("airbase panel");
        assert_eq!(err.to_string(), "render error (airbase panel): disk full");

        let err = DeckImageError::unknown_theme("x").in_stage("fleet #1");
        assert!(matches!(err, DeckImageError::UnknownTheme(_)));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = DeckImageError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
