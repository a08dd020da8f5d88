use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{debug, LevelFilter};
use num_bigint::BigInt;

use rsa_workbench::rsa::bigint::to_bytes;
use rsa_workbench::rsa::{
    generate_distinct_primes_with_rng, generate_prime_with_rng, is_probable_prime, transform,
    transform_checked, KeyParameters, RsaBigInt,
};
use rsa_workbench::RsaConfig;

#[derive(Parser)]
#[command(
    name = "rsa-workbench",
    author,
    version,
    about = "Textbook RSA over lists of integers (educational, unpadded)"
)]
struct Cli {
    #[arg(long, global = true)]
    debug: bool,
    /// JSON file overriding enumeration bound, rounds, prime bits and attempts
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Miller-Rabin test on a single integer
    IsPrime {
        #[arg(allow_negative_numbers = true)]
        n: BigInt,
        #[arg(long)]
        rounds: Option<u32>,
    },
    /// Draw a random prime (or two distinct ones with --pair)
    GenPrime {
        #[arg(long)]
        bits: Option<u32>,
        #[arg(long)]
        pair: bool,
    },
    /// List every valid (e, d) pair for two primes
    Keys {
        #[arg(long)]
        p: RsaBigInt,
        #[arg(long)]
        q: RsaBigInt,
        #[arg(long)]
        bound: Option<u64>,
        #[arg(long)]
        json: bool,
    },
    /// c = m^e mod n for every value
    Encrypt {
        #[arg(long)]
        e: RsaBigInt,
        #[arg(long)]
        n: RsaBigInt,
        #[arg(required = true)]
        values: Vec<RsaBigInt>,
        /// Print blocks as big-endian hex
        #[arg(long)]
        hex: bool,
        /// Refuse values that are not below n
        #[arg(long)]
        strict: bool,
    },
    /// m = c^d mod n for every value
    Decrypt {
        #[arg(long)]
        d: RsaBigInt,
        #[arg(long)]
        n: RsaBigInt,
        #[arg(required = true)]
        values: Vec<RsaBigInt>,
        #[arg(long)]
        hex: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    let config = load_config(cli.config.as_ref())?;
    debug!("using {config:?}");

    match cli.command {
        Commands::IsPrime { n, rounds } => {
            cmd_is_prime(&n, rounds.unwrap_or(config.miller_rabin_rounds))
        }
        Commands::GenPrime { bits, pair } => {
            cmd_gen_prime(bits.unwrap_or(config.prime_bits), pair, &config)
        }
        Commands::Keys { p, q, bound, json } => {
            cmd_keys(p, q, bound.unwrap_or(config.enumeration_bound), json, &config)
        }
        Commands::Encrypt {
            e,
            n,
            values,
            hex,
            strict,
        } => {
            let blocks = if strict {
                transform_checked(&values, &e, &n)
            } else {
                transform(&values, &e, &n)
            }
            .context("encryption failed")?;
            print_blocks(&blocks, hex);
            Ok(())
        }
        Commands::Decrypt { d, n, values, hex } => {
            let blocks = transform(&values, &d, &n).context("decryption failed")?;
            print_blocks(&blocks, hex);
            Ok(())
        }
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default));
    builder.format_timestamp(None);
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

fn load_config(path: Option<&PathBuf>) -> Result<RsaConfig> {
    match path {
        Some(path) => RsaConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(RsaConfig::default()),
    }
}

fn cmd_is_prime(n: &BigInt, rounds: u32) -> Result<()> {
    let verdict = if is_probable_prime(n, rounds) {
        "probably prime"
    } else {
        "composite"
    };
    println!("{n}: {verdict}");
    Ok(())
}

fn cmd_gen_prime(bits: u32, pair: bool, config: &RsaConfig) -> Result<()> {
    let mut rng = rand::thread_rng();
    let rounds = config.miller_rabin_rounds;
    let attempts = config.max_prime_attempts;

    if pair {
        let (p, q) = generate_distinct_primes_with_rng(bits, rounds, attempts, &mut rng)
            .context("prime generation failed")?;
        println!("p = {p}");
        println!("q = {q}");
    } else {
        let p = generate_prime_with_rng(bits, rounds, attempts, &mut rng)
            .context("prime generation failed")?;
        println!("{p}");
    }
    Ok(())
}

fn cmd_keys(p: RsaBigInt, q: RsaBigInt, bound: u64, json: bool, config: &RsaConfig) -> Result<()> {
    if bound < 2 {
        bail!("--bound must be at least 2, got {bound}");
    }
    let params = KeyParameters::with_rounds(p, q, config.miller_rabin_rounds)
        .context("invalid primes")?;
    let table = params.key_table(bound);

    if json {
        let text = serde_json::to_string_pretty(&table).context("failed to serialize key table")?;
        println!("{text}");
        return Ok(());
    }

    println!(
        "p = {}, q = {}, n = {}, phi(n) = {}",
        params.p, params.q, params.n, params.phi
    );
    if table.is_empty() {
        println!("No valid key pair exists for these primes; choose larger ones.");
        return Ok(());
    }
    println!("{:>6}  {:>12}  {:>12}", "index", "e", "d");
    for (index, pair) in table.iter().enumerate() {
        println!("{index:>6}  {:>12}  {:>12}", pair.e.to_string(), pair.d.to_string());
    }
    Ok(())
}

fn print_blocks(blocks: &[RsaBigInt], as_hex: bool) {
    let rendered: Vec<String> = blocks
        .iter()
        .map(|block| {
            if as_hex {
                hex::encode(to_bytes(block))
            } else {
                block.to_string()
            }
        })
        .collect();
    println!("{}", rendered.join(" "));
}
