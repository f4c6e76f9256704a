use std::convert::Infallible;

use clap::Args;
use common::protocol;

/// Generate a fresh nonce for a new exchange
#[derive(Args, Debug, Clone)]
pub struct Nonce;

#[async_trait::async_trait]
impl crate::cli::op::Op for Nonce {
    type Error = Infallible;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        Ok(protocol::create_nonce().to_hex())
    }
}
