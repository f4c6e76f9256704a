use clap::Args;
use common::codec;
use common::crypto::threshold::{self, Commitment};
use common::crypto::{HashAlgorithm, ThresholdError};

/// Recover a secret from its shares
///
/// Without `--commitment` too few shares silently give a wrong secret.
#[derive(Args, Debug, Clone)]
pub struct Combine {
    /// Shares, in any order
    #[arg(required = true)]
    pub shares: Vec<String>,

    /// Commitment printed by `split --commit`; reconstruction is checked against it
    #[arg(long)]
    pub commitment: Option<String>,

    /// Override the configured digest for the commitment
    #[arg(long)]
    pub hash: Option<HashAlgorithm>,
}

#[derive(Debug, thiserror::Error)]
pub enum CombineError {
    #[error("combine failed: {0}")]
    Threshold(#[from] ThresholdError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Combine {
    type Error = CombineError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let secret = match &self.commitment {
            Some(hex) => {
                let commitment = Commitment::from_hex(hex)?;
                let hash = self.hash.unwrap_or(ctx.config.hash);
                threshold::combine_verified(&self.shares, &commitment, hash)?
            }
            None => threshold::combine(&self.shares)?,
        };
        Ok(codec::bytes_to_hex(&secret))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cli::op::Op;
    use crate::cli::ops::{split::SplitError, test_util, Split};

    #[tokio::test]
    async fn test_split_combine() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_util::context(&dir);
        let secret = format!("0x{}", "00".repeat(32));

        let output = Split {
            secret: secret.clone(),
            min: None,
            total: None,
            commit: true,
            hash: None,
        }
        .execute(&ctx)
        .await
        .unwrap()
        .to_string();

        let lines: Vec<&str> = output.lines().collect();
        // default 3 of 5, plus the commitment
        assert_eq!(lines.len(), 6);
        let commitment = lines[5].strip_prefix("commitment: ").unwrap().to_string();
        let shares: Vec<String> = lines[..5].iter().map(|s| s.to_string()).collect();

        let mut combine = Combine {
            shares: shares[2..].to_vec(),
            commitment: Some(commitment),
            hash: None,
        };
        assert_eq!(combine.execute(&ctx).await.unwrap(), secret);

        combine.shares = shares[..2].to_vec();
        assert!(matches!(
            combine.execute(&ctx).await,
            Err(CombineError::Threshold(ThresholdError::CommitmentMismatch))
        ));

        combine.commitment = None;
        assert_ne!(combine.execute(&ctx).await.unwrap(), secret);
    }

    #[tokio::test]
    async fn test_split_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_util::bare_context(&dir);

        let output = Split {
            secret: "0xdeadbeef".to_string(),
            min: Some(1),
            total: Some(2),
            commit: false,
            hash: None,
        }
        .execute(&ctx)
        .await
        .unwrap()
        .to_string();
        let shares: Vec<String> = output.lines().map(String::from).collect();
        assert_eq!(shares.len(), 2);

        for share in shares {
            let combine = Combine {
                shares: vec![share],
                commitment: None,
                hash: None,
            };
            assert_eq!(combine.execute(&ctx).await.unwrap(), "0xdeadbeef");
        }

        let bad = Split {
            secret: "0xdeadbeef".to_string(),
            min: Some(3),
            total: Some(2),
            commit: false,
            hash: None,
        };
        assert!(matches!(
            bad.execute(&ctx).await,
            Err(SplitError::Threshold(ThresholdError::Config(_)))
        ));
    }
}
