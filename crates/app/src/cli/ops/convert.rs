use clap::{Args, ValueEnum};
use common::codec::{self, CodecError};

/// Text and integer forms a byte string can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Encoding {
    /// `0x`-prefixed hex
    Hex,
    Base58,
    /// Big-endian unsigned decimal integer
    Bigint,
    /// Comma-separated per-byte hex literals, e.g. `0x1,0xff`
    HexArray,
}

/// Convert a byte string between encodings
#[derive(Args, Debug, Clone)]
pub struct Convert {
    /// Encoding of the input
    #[arg(long, value_enum)]
    pub from: Encoding,

    /// Encoding of the output
    #[arg(long, value_enum)]
    pub to: Encoding,

    /// Output length in bytes when decoding an integer (left-padded with zeros)
    #[arg(long)]
    pub length: Option<usize>,

    pub value: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("invalid input: {0}")]
    Codec(#[from] CodecError),
    #[error("invalid integer: {0}")]
    Integer(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Convert {
    type Error = ConvertError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let value = self.value.trim();
        let bytes = match self.from {
            Encoding::Hex => codec::hex_to_bytes(value)?,
            Encoding::Base58 => codec::base58_to_bytes(value)?,
            Encoding::Bigint => {
                let n: num_bigint::BigUint = value
                    .parse()
                    .map_err(|e: num_bigint::ParseBigIntError| ConvertError::Integer(e.to_string()))?;
                let minimal = ((n.bits() + 7) / 8) as usize;
                codec::bigint_to_bytes(&n, self.length.unwrap_or(minimal))?
            }
            Encoding::HexArray => {
                let items: Vec<&str> = value.split(',').map(str::trim).collect();
                codec::hex_array_to_bytes(&items)?
            }
        };

        Ok(match self.to {
            Encoding::Hex => codec::bytes_to_hex(&bytes),
            Encoding::Base58 => codec::bytes_to_base58(&bytes),
            Encoding::Bigint => codec::bytes_to_bigint(&bytes).to_string(),
            Encoding::HexArray => codec::bytes_to_hex_array(&bytes).join(","),
        })
    }
}
