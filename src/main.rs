use bpi_archiver::telemetry::{init_logging, LogFormat};
use bpi_archiver::{ArchiverConfig, QuoteArchiver};

use clap::{Command, CommandFactory, Parser};
use clap_complete::{generate, Generator, Shell};

#[cfg(feature = "cli")]
use dotenv::dotenv;

use std::io;

#[derive(Parser, PartialEq, Debug)]
#[command(name = "bpi-archiver")]
#[command(version = "0.1.0")]
#[command(about = "Fetches the current Bitcoin Price Index quote and archives it to S3,
keyed by the quote's own timestamp.", long_about = None)]
struct Cli {
    /// Generates shell completions for the given shell
    #[arg(long = "shell-completions", value_enum)]
    generator: Option<Shell>,

    /// Fetches the quote and uploads it to the configured bucket
    #[arg(short, long)]
    archive: bool,

    /// Fetches the quote and prints its key and body without uploading
    #[arg(short, long = "dry-run")]
    dry_run: bool,

    /// Overrides BPI_ENDPOINT_URL
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Overrides BPI_BUCKET_NAME
    #[arg(long)]
    bucket: Option<String>,
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

fn config_from(opt: &Cli) -> Result<ArchiverConfig, Box<dyn std::error::Error>> {
    let mut config = ArchiverConfig::from_env()?;
    if let Some(url) = &opt.endpoint_url {
        config.endpoint_url = url.clone();
    }
    if let Some(bucket) = &opt.bucket {
        config.bucket_name = bucket.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "cli")]
    dotenv().ok();

    let opt = Cli::parse();
    if let Some(generator) = opt.generator {
        let mut cmd = Cli::command();
        print_completions(generator, &mut cmd);
        return Ok(());
    }

    init_logging(LogFormat::Pretty, "bpi_archiver=info");
    if opt.dry_run {
        let archiver = QuoteArchiver::from_config(config_from(&opt)?).await?;
        let object = archiver.preview().await?;
        println!("s3://{}/{}", object.bucket, object.key);
        println!("{}", object.body);
    } else if opt.archive {
        let archiver = QuoteArchiver::from_config(config_from(&opt)?).await?;
        let archived = archiver.archive().await?;
        println!("{}", serde_json::to_string(&archived)?);
    } else {
        Cli::command().print_help()?;
    }
    Ok(())
}
