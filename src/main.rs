use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

use fuzzdex::{logging, matcher, scan, util, HashOptions};

const LISTING_HEADER: &str = "ssdeep,1.1--blocksize:hash:hash,filename";

#[derive(Parser)]
#[command(name = "fuzzdex", about = "Fuzzy hashing and near-duplicate detection")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct HashFlags {
    /// Collapse runs of more than three identical symbols
    #[arg(long, short = 's')]
    eliminate_sequences: bool,
    /// Keep the second digest part at full length
    #[arg(long, short = 't')]
    no_truncate: bool,
}

impl From<HashFlags> for HashOptions {
    fn from(flags: HashFlags) -> Self {
        HashOptions {
            eliminate_sequences: flags.eliminate_sequences,
            do_not_truncate: flags.no_truncate,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the fuzzy hash of files
    Hash {
        /// Files (or directories with --recursive) to hash
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Descend into directories
        #[arg(long, short)]
        recursive: bool,
        /// Print only the fingerprints, without header or file names
        #[arg(long)]
        bare: bool,
        #[command(flatten)]
        flags: HashFlags,
    },
    /// Score the similarity of two fingerprints (or two files) from 0 to 100
    Compare {
        /// Fingerprint text or path to a file
        first: String,
        /// Fingerprint text or path to a file
        second: String,
    },
    /// Fingerprint a directory tree into a signature database
    Scan {
        /// Directory to fingerprint
        #[arg(long)]
        dir: PathBuf,
        /// Output path for the signature database
        #[arg(long, short)]
        output: PathBuf,
        #[command(flatten)]
        flags: HashFlags,
    },
    /// Match files against a signature database
    Match {
        /// Signature database produced by `scan`
        #[arg(long)]
        db: PathBuf,
        /// Report only scores strictly above this value
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=100))]
        threshold: u32,
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

/// Fingerprint text as given, or the hash of the file it names.
fn resolve_fingerprint(arg: &str) -> Result<String> {
    let path = Path::new(arg);
    if path.is_file() {
        debug!(path = %path.display(), "hashing comparison operand");
        return fuzzdex::hash_file(path, HashOptions::default())
            .with_context(|| format!("Failed to hash file: {}", path.display()));
    }
    Ok(arg.to_string())
}

fn hash_command(paths: Vec<PathBuf>, recursive: bool, bare: bool, options: HashOptions) -> Result<()> {
    let paths: Vec<PathBuf> = paths
        .into_iter()
        .filter(|path| {
            let keep = recursive || !path.is_dir();
            if !keep {
                warn!(path = %path.display(), "is a directory, use --recursive");
            }
            keep
        })
        .collect();
    let entries = util::collect_files(&paths)?;

    let (signatures, skipped) = scan::fingerprint_entries(&entries, options);

    if !bare {
        println!("{}", LISTING_HEADER);
    }
    for sig in &signatures {
        if bare {
            println!("{}", sig.fingerprint);
        } else {
            println!("{},{}", sig.fingerprint, util::quote_path(&sig.path));
        }
    }

    if skipped > 0 {
        bail!("{} file(s) could not be hashed", skipped);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match cli.command {
        Commands::Hash {
            paths,
            recursive,
            bare,
            flags,
        } => {
            tokio::task::spawn_blocking(move || hash_command(paths, recursive, bare, flags.into()))
                .await??;
        }
        Commands::Compare { first, second } => {
            let a = resolve_fingerprint(&first)?;
            let b = resolve_fingerprint(&second)?;
            let score = fuzzdex::compare(&a, &b)
                .with_context(|| format!("Failed to compare {:?} and {:?}", a, b))?;
            println!("{}", score);
        }
        Commands::Scan { dir, output, flags } => {
            println!("Scanning...");
            println!("  Directory: {}", dir.display());
            println!("  Output: {}", output.display());

            let start = Instant::now();
            let summary = scan::scan_directory(&dir, &output, flags.into()).await?;
            let elapsed = start.elapsed();

            println!("\nSignature database written!");
            println!("  Files hashed: {}", summary.files_hashed);
            println!("  Files skipped: {}", summary.files_skipped);
            println!("  Bytes hashed: {}", summary.bytes_hashed);
            println!("  Time elapsed: {:.3}s", elapsed.as_secs_f64());
        }
        Commands::Match {
            db,
            threshold,
            paths,
        } => {
            let matches = matcher::match_paths(&db, paths, threshold).await?;
            for m in &matches {
                let note = if m.identical { " (identical)" } else { "" };
                println!(
                    "{} matches {} ({}){}",
                    util::quote_path(&m.target),
                    util::quote_path(&m.known),
                    m.score,
                    note
                );
            }
        }
    }

    Ok(())
}
