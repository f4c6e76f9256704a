use clap::Args;
use common::config::ProtocolConfig;
use common::crypto::{Cipher, HashAlgorithm, ThresholdParams};

use crate::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Digest for message secrets and commitments
    #[arg(long, default_value_t = HashAlgorithm::default())]
    pub hash: HashAlgorithm,

    /// Cipher for envelopes
    #[arg(long, default_value_t = Cipher::default())]
    pub cipher: Cipher,

    /// Default number of shares needed to recover a split secret
    #[arg(long, default_value_t = ThresholdParams::default().min_fragments)]
    pub min: usize,

    /// Default number of shares to split a secret into
    #[arg(long, default_value_t = ThresholdParams::default().total_fragments)]
    pub total: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] crate::state::StateError),
    #[error("invalid threshold: {0}")]
    Threshold(#[from] common::crypto::ThresholdError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = ProtocolConfig {
            hash: self.hash,
            cipher: self.cipher,
            threshold: ThresholdParams::new(self.min, self.total)?,
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;
        let public_key = state.load_key()?.public();

        let output = format!(
            "Initialized veil directory at: {}\n\
             - Key: {}\n\
             - Config: {}\n\
             - Public key: {}\n\
             - Hash: {}\n\
             - Cipher: {}\n\
             - Threshold: {} of {}",
            state.veil_dir.display(),
            state.key_path.display(),
            state.config_path.display(),
            public_key,
            state.config.hash,
            state.config.cipher,
            state.config.threshold.min_fragments,
            state.config.threshold.total_fragments,
        );

        Ok(output)
    }
}
