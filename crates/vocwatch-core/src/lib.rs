mod app_config;
mod clock;
mod config;
mod mention;
mod normalize;
mod terms;

pub use app_config::AppConfig;
pub use clock::{now_stamp, today_stamp};
pub use config::{load_app_config, load_app_config_from_env};
pub use mention::{Candidate, CandidateKind, Mention, NEW_MARKER};
pub use normalize::Normalizer;
pub use terms::{load_terms, parse_terms, TermConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read terms file {path}: {source}")]
    TermsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse terms file: {0}")]
    TermsFileParse(#[from] serde_yaml::Error),

    #[error("invalid terms config: {0}")]
    Validation(String),
}
