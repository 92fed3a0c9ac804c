#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("Could not build the HTTP client: {0}")]
    Build(reqwest::Error),

    #[error("Invalid endpoint URL `{endpoint}`: {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },

    #[error("Invalid header `{0}`")]
    InvalidHeader(String),

    #[error("Could not complete request to GraphQL server: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The GraphQL server did not answer with JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Could not find valid data in the introspection response{}", format_errors(.0))]
    MissingData(Vec<String>),
}

fn format_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }

    format!(": {}", errors.join(", "))
}
