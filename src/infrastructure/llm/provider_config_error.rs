#[derive(Debug, thiserror::Error)]
pub enum ProviderConfigError {
    #[error("missing API key for {0}")]
    MissingApiKey(&'static str),
    #[error("http client could not be built: {0}")]
    HttpClient(String),
}
