use std::fmt;

use clap::Args;
use common::codec::{self, CodecError};
use common::crypto::threshold::{self, Commitment, ShareSet};
use common::crypto::{HashAlgorithm, ThresholdError, ThresholdParams};

/// Split a secret into threshold shares
#[derive(Args, Debug, Clone)]
pub struct Split {
    /// Secret as hex
    #[arg(long)]
    pub secret: String,

    /// Shares needed to recover (defaults to the configured threshold)
    #[arg(long)]
    pub min: Option<usize>,

    /// Shares to create (defaults to the configured threshold)
    #[arg(long)]
    pub total: Option<usize>,

    /// Also print a commitment to the secret for `combine --commitment`
    #[arg(long)]
    pub commit: bool,

    /// Override the configured digest for the commitment
    #[arg(long)]
    pub hash: Option<HashAlgorithm>,
}

#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("invalid secret: {0}")]
    Codec(#[from] CodecError),
    #[error("split failed: {0}")]
    Threshold(#[from] ThresholdError),
}

#[derive(Debug)]
pub struct SplitOutput {
    shares: ShareSet,
    commitment: Option<Commitment>,
}

impl fmt::Display for SplitOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self.shares.to_strings();
        write!(f, "{}", lines.join("\n"))?;
        if let Some(commitment) = &self.commitment {
            write!(f, "\ncommitment: {}", commitment.to_hex())?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Split {
    type Error = SplitError;
    type Output = SplitOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let secret = zeroize::Zeroizing::new(codec::hex_to_bytes(&self.secret)?);
        let configured = ctx.config.threshold;
        let params = ThresholdParams::new(
            self.min.unwrap_or(configured.min_fragments),
            self.total.unwrap_or(configured.total_fragments),
        )?;

        let shares = threshold::split(&secret, params.min_fragments, params.total_fragments)?;
        let commitment = self
            .commit
            .then(|| Commitment::of(&secret, self.hash.unwrap_or(ctx.config.hash)));

        Ok(SplitOutput { shares, commitment })
    }
}
