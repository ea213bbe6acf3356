use thiserror::Error;
use vitrina_relocation::RelocationError;
use vitrina_rest::RestError;

#[derive(Debug, Error)]
pub enum VtrError {
    #[error("Operator not configured. Add an [operator] table to ~/.config/vitrina/config.toml")]
    OperatorNotConfigured,

    #[error("Responsible party missing. Pass --responsible or configure [operator].name")]
    ResponsibleMissing,

    #[error("Exhibit {0} not found")]
    ExhibitNotFound(vitrina_core::ExhibitId),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    Rest(#[from] RestError),

    #[error("Relocation failed: {0}")]
    Relocation(#[from] RelocationError<RestError>),

    #[error("Location lookup failed: {0}")]
    Resolve(#[from] vitrina_relocation::ResolveError<RestError>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
