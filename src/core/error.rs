use thiserror::Error;

/// Failure of a dataset load
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Transport failure, timeout, or a non-success HTTP status
    #[error("network error: {0}")]
    Network(String),

    /// The body did not match `{ status: "success", data: { region: [row] } }`
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl LoadError {
    /// Text shown to the user in the error notification
    pub fn user_message(&self, source_title: &str) -> String {
        match self {
            Self::Network(_) => format!("Failed to load {} data. Please try again.", source_title),
            Self::MalformedResponse(_) => "The data format received was not as expected".to_string(),
        }
    }
}
