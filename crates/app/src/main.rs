// CLI modules
mod cli;
mod state;
mod version;

use clap::{Parser, Subcommand};
use cli::{
    args::Args, op::Op, Combine, Convert, Decrypt, Encrypt, Init, Keypair, MessageSecret,
    NewShare, Nonce, Seal, Split, Unseal, Version,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

command_enum! {
    (Init, Init),
    (Keypair, Keypair),
    (Nonce, Nonce),
    (MessageSecret, MessageSecret),
    (Encrypt, Encrypt),
    (Decrypt, Decrypt),
    (Seal, Seal),
    (Unseal, Unseal),
    (Split, Split),
    (Combine, Combine),
    (NewShare, NewShare),
    (Convert, Convert),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Logs go to stderr so command output stays pipeable
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let env_filter = EnvFilter::builder()
        .with_default_directive(args.log_level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(non_blocking_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_layer).init();

    let ctx = match cli::op::OpContext::new(args.config_path) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: Failed to load veil state: {}", e);
            std::process::exit(1);
        }
    };

    // exit() skips destructors, so flush pending logs first
    let code = match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };
    drop(guard);
    std::process::exit(code);
}
