use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("contract must be a JSON object, got {0}")]
    ContractNotObject(&'static str),

    #[error("variations must be a JSON array, got {0}")]
    VariationsNotList(&'static str),

    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
}
