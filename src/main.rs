use std::num::NonZeroU64;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use chunkstore::config::DEFAULT_CHUNK_SIZE;
use chunkstore::{SplitOptions, SplitOutcome, reconstruct, split};

#[derive(Parser)]
#[command(name = "chunkstore")]
#[command(about = "Split oversized artifacts into verifiable chunks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Split a file into chunks next to it using ./chunkstore split big.bin")]
    Split {
        #[arg(value_name = "INPUT_FILE")]
        input: PathBuf,

        /// Maximum chunk size in bytes
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: NonZeroU64,

        /// Remove the original file after a successful split
        #[arg(long)]
        delete_original: bool,
    },
    #[command(
        about = "Reassemble and verify a file using ./chunkstore reconstruct big.bin.manifest.json"
    )]
    Reconstruct {
        #[arg(value_name = "MANIFEST_FILE")]
        manifest: PathBuf,
    },
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Split {
            input,
            chunk_size,
            delete_original,
        } => {
            let opts = SplitOptions {
                chunk_size,
                delete_original,
            };
            match split(&input, &opts)? {
                SplitOutcome::Split {
                    manifest_path,
                    chunk_count,
                } => {
                    println!(
                        "split {} into {chunk_count} chunks, manifest at {}",
                        input.display(),
                        manifest_path.display()
                    );
                }
                SplitOutcome::NotRequired { size } => {
                    println!(
                        "{} is {size} bytes, fits in one chunk, no split needed",
                        input.display()
                    );
                }
            }
        }
        Commands::Reconstruct { manifest } => {
            let output = reconstruct(&manifest)?;
            println!("reconstructed and verified {}", output.display());
        }
    }
    Ok(())
}
