use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse slide layout: {0}")]
    LayoutParse(#[source] serde_yaml::Error),

    #[error("invalid slide layout: {0}")]
    LayoutInvalid(String),

    #[error("failed to serialize artifact: {0}")]
    Serialize(#[from] serde_json::Error),
}
