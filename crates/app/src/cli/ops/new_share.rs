use clap::Args;
use common::crypto::threshold;
use common::crypto::ThresholdError;

/// Derive an additional share from existing ones
#[derive(Args, Debug, Clone)]
pub struct NewShare {
    /// Id of the new share, 1 to 255
    #[arg(long)]
    pub id: u8,

    /// At least as many existing shares as the split threshold
    #[arg(required = true)]
    pub shares: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NewShareError {
    #[error("new share failed: {0}")]
    Threshold(#[from] ThresholdError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for NewShare {
    type Error = NewShareError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        Ok(threshold::new_share(self.id, &self.shares)?.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cli::op::Op;
    use crate::cli::ops::test_util;

    #[tokio::test]
    async fn test_new_share() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_util::bare_context(&dir);
        let shares = threshold::split(b"custodian", 2, 2).unwrap().to_strings();

        let extra = NewShare {
            id: 9,
            shares: shares.clone(),
        }
        .execute(&ctx)
        .await
        .unwrap();
        assert!(extra.starts_with("809"));

        let recovered = threshold::combine(&[shares[0].clone(), extra]).unwrap();
        assert_eq!(recovered, b"custodian");
    }
}
