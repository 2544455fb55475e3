// RSA Engine CLI
// Logs to stderr (RUST_LOG filter, LOG_FORMAT=json for JSON lines); results go to stdout

use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rsa_engine::rsa::{self, Algorithm, RsaBigInt};
use rsa_engine::util::EngineConfig;
use rsa_engine::witness;

#[derive(Parser)]
#[command(name = "rsa_engine", about = "Primality testing, RSA key generation and chunked encryption")]
struct Cli {
    /// Seed for a reproducible random stream (fresh OS entropy when omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct EngineArgs {
    /// Bits per prime factor
    #[arg(long, env = "RSA_ENGINE_BITS", default_value_t = 16)]
    bits: u64,

    /// Primality test: trial, miller-rabin or aks
    #[arg(long, env = "RSA_ENGINE_ALGORITHM", default_value = "miller-rabin")]
    algorithm: Algorithm,

    /// Miller-Rabin rounds
    #[arg(long, env = "RSA_ENGINE_ROUNDS", default_value_t = 10)]
    rounds: u32,
}

impl From<EngineArgs> for EngineConfig {
    fn from(args: EngineArgs) -> Self {
        EngineConfig::default()
            .with_bit_length(args.bits)
            .with_algorithm(args.algorithm)
            .with_test_rounds(args.rounds)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an RSA key pair and print (e, n) and (d, n)
    Keygen {
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Generate a single prime of the configured bit length
    Prime {
        #[command(flatten)]
        engine: EngineArgs,
        /// Race candidates across all cores
        #[arg(long)]
        parallel: bool,
    },
    /// Test a decimal integer for primality
    IsPrime {
        /// Integer to test, in decimal
        n: String,
        /// Primality test: trial, miller-rabin or aks
        #[arg(long, default_value = "miller-rabin")]
        algorithm: Algorithm,
        /// Miller-Rabin rounds
        #[arg(long, default_value_t = 20)]
        rounds: u32,
    },
    /// Encrypt a message with a fresh key pair, print the chunks and decrypt them again
    Roundtrip {
        #[command(flatten)]
        engine: EngineArgs,
        /// Message to encrypt
        #[arg(long)]
        message: String,
    },
    /// Print Fermat, divisor and gcd witness counts for composites up to a limit
    Witnesses {
        #[arg(
            long,
            default_value_t = 100,
            value_parser = clap::value_parser!(u64).range(0..=witness::MAX_WITNESS_LIMIT)
        )]
        limit: u64,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match cli.command {
        Commands::Keygen { engine } => {
            let config = EngineConfig::from(engine);
            let keypair = config.generate_keypair(&mut rng)?;
            println!("public:  {}", keypair.public_key());
            println!("private: {}", keypair.private_key());
        }
        Commands::Prime { engine, parallel } => {
            let config = EngineConfig::from(engine);
            let prime = if parallel {
                rsa::generate_prime_parallel(config.bit_length, config.algorithm, config.test_rounds, &mut rng)?
            } else {
                config.generate_prime(&mut rng)?
            };
            println!("{prime}");
        }
        Commands::IsPrime { n, algorithm, rounds } => {
            let n: RsaBigInt = n.trim().parse().with_context(|| format!("not a decimal integer: {n}"))?;
            let verdict = rsa::is_prime(&n, algorithm, rounds, &mut rng);
            println!("{n}: {}", if verdict { "prime" } else { "composite" });
        }
        Commands::Roundtrip { engine, message } => {
            let config = EngineConfig::from(engine);
            let keypair = config.generate_keypair(&mut rng)?;
            let sealed = rsa::seal(message.as_bytes(), keypair.public_key())?;

            info!(chunks = sealed.chunks().len(), chunk_size = keypair.public_key().chunk_size(), "encrypted");
            for chunk in sealed.chunks() {
                println!("{}", hex::encode(chunk.to_bytes_be()));
            }

            let plaintext = rsa::open(&sealed, keypair.private_key())?;
            println!("{}", String::from_utf8_lossy(&plaintext));
        }
        Commands::Witnesses { limit } => {
            let table = witness::composite_witness_table(limit)?;
            println!("{:>8} {:>8} {:>8} {:>8} {:>8}", "c", "fermat", "divisor", "gcd", "ratio");
            for row in table {
                println!(
                    "{:>8} {:>8} {:>8} {:>8} {:>8.3}",
                    row.composite,
                    row.fermat,
                    row.divisor,
                    row.gcd,
                    row.fermat_ratio()
                );
            }
        }
    }
    Ok(())
}

fn main() {
    init_logging();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
