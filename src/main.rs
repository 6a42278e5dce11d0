use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use clats::io_utils::{crack_cli_error, io_cli_error, simple_cli_error};
use clats::{
    identify, install_interrupt_handler, Algorithm, BruteForce, CancellationToken, CandidateSource,
    Config, CrackJob, CrackOutcome, Dictionary, DigestRegistry, JobObserver, NoopObserver,
    ProgressBarObserver, Scheduler,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const EXIT_NOT_FOUND: i32 = 2;
const EXIT_CANCELLED: i32 = 130;

/// Recover plaintexts from password digests.
#[derive(Parser)]
#[command(name = "clats", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Only log warnings and hide the progress bar
    #[arg(global = true, short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List the algorithms that could have produced a digest
    Identify {
        digest: String,
    },
    /// Print the digest of a plaintext
    Digest {
        #[arg(short, long)]
        algorithm: String,
        plaintext: String,
    },
    /// Search for the plaintext of a digest
    Crack(CrackArgs),
}

#[derive(Args)]
struct CrackArgs {
    /// Target digest
    digest: String,
    /// Algorithm id, or `auto` to detect it from the digest
    #[arg(short, long, default_value = "auto")]
    algorithm: String,
    /// Wordlist files, one candidate per line
    #[arg(
        short,
        long = "wordlist",
        num_args = 1..,
        required_unless_present = "brute_force",
        conflicts_with = "brute_force"
    )]
    wordlists: Vec<PathBuf>,
    /// Enumerate every string of --length over --charset
    #[arg(long, requires = "length")]
    brute_force: bool,
    /// Candidate length for brute force
    #[arg(short, long)]
    length: Option<usize>,
    /// Brute-force alphabet (default: letters and digits)
    #[arg(long)]
    charset: Option<String>,
    /// Number of worker threads
    #[arg(long)]
    workers: Option<usize>,
    /// Give up after this many seconds
    #[arg(long)]
    timeout: Option<u64>,
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Never pause for system load
    #[arg(long)]
    no_throttle: bool,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

fn init_logging(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("clats=warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clats=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<i32, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    match cli.command {
        Command::Identify { digest } => {
            let found = identify(digest.trim());
            if found.is_empty() {
                return Err(simple_cli_error(&format!(
                    "no known algorithm produces a digest like '{}'",
                    digest.trim()
                ))
                .into());
            }
            for algorithm in found {
                println!("{algorithm}");
            }
            Ok(0)
        }
        Command::Digest {
            algorithm,
            plaintext,
        } => {
            let algorithm = Algorithm::parse(&algorithm)
                .map_err(|e| crack_cli_error("digest", e))?;
            let hex = DigestRegistry::standard()
                .digest_hex(algorithm, &plaintext)
                .ok_or_else(|| {
                    simple_cli_error(&format!(
                        "{algorithm} digests carry a random salt; they cannot be computed here"
                    ))
                })?;
            println!("{hex}");
            Ok(0)
        }
        Command::Crack(args) => crack(args, cli.quiet),
    }
}

fn load_config(args: &CrackArgs) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => {
            let text =
                fs::read_to_string(path).map_err(|e| io_cli_error("reading config", path, e))?;
            Config::from_json(&text).map_err(|e| crack_cli_error("config", e))?
        }
        None => Config::default(),
    };
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(charset) = &args.charset {
        config.charset = charset.clone();
    }
    if args.timeout.is_some() {
        config.timeout_secs = args.timeout;
    }
    if args.no_throttle {
        config.throttle.enabled = false;
    }
    config
        .validate()
        .map_err(|e| crack_cli_error("config", e))?;
    Ok(config)
}

fn resolve_algorithm(id: &str, digest: &str) -> Result<Algorithm, Box<dyn std::error::Error>> {
    if !id.eq_ignore_ascii_case("auto") {
        return Algorithm::parse(id).map_err(|e| crack_cli_error("algorithm", e).into());
    }
    let found = identify(digest);
    let mut iter = found.iter();
    match (iter.next(), iter.next()) {
        (Some(&algorithm), None) => {
            info!(%algorithm, "detected algorithm");
            Ok(algorithm)
        }
        (None, _) => Err(simple_cli_error(&format!(
            "cannot detect the algorithm of '{digest}'; pass --algorithm"
        ))
        .into()),
        (Some(_), Some(_)) => {
            let ids: Vec<&str> = found.iter().map(|a| a.id()).collect();
            Err(simple_cli_error(&format!(
                "digest is ambiguous, could be any of: {}. Pass --algorithm",
                ids.join(", ")
            ))
            .into())
        }
    }
}

fn crack(args: CrackArgs, quiet: bool) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(&args)?;
    let digest = args.digest.trim();
    let algorithm = resolve_algorithm(&args.algorithm, digest)?;

    let source: CandidateSource = if args.brute_force {
        let length = args
            .length
            .ok_or_else(|| simple_cli_error("--brute-force needs --length"))?;
        BruteForce::new(&config.charset, length)
            .map_err(|e| crack_cli_error("brute force", e))?
            .into()
    } else {
        Dictionary::load(args.wordlists.as_slice()).into()
    };

    let job = CrackJob::new(digest, algorithm, source, config.workers)
        .map_err(|e| crack_cli_error("crack", e))?;

    let token = CancellationToken::new();
    install_interrupt_handler(token.clone()).map_err(|e| crack_cli_error("crack", e))?;

    let observer: Arc<dyn JobObserver> = if quiet || args.json {
        Arc::new(NoopObserver)
    } else {
        Arc::new(ProgressBarObserver::new())
    };
    let scheduler = Scheduler::from_config(&config, Arc::new(DigestRegistry::standard()))
        .with_observer(observer)
        .with_cancellation(token);

    let report = scheduler
        .run(&job)
        .map_err(|e| crack_cli_error("crack", e))?;

    if args.json {
        let out = serde_json::json!({
            "digest": job.target(),
            "algorithm": job.algorithm().id(),
            "outcome": report.outcome.label(),
            "plaintext": report.outcome.plaintext(),
            "attempted": report.progress.attempted,
            "total": report.progress.total,
            "elapsed_secs": report.progress.elapsed.as_secs_f64(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        match &report.outcome {
            CrackOutcome::Found(plain) => println!("Password found: {plain}"),
            CrackOutcome::NotFound => println!(
                "No password found after {} candidates",
                report.progress.attempted
            ),
            CrackOutcome::Cancelled(_) => eprintln!(
                "Stopped ({}) after {} of {} candidates",
                report.outcome.label(),
                report.progress.attempted,
                report.progress.total
            ),
        }
    }

    Ok(match report.outcome {
        CrackOutcome::Found(_) => 0,
        CrackOutcome::NotFound => EXIT_NOT_FOUND,
        CrackOutcome::Cancelled(_) => EXIT_CANCELLED,
    })
}
