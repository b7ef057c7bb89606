//! # Calculator CLI
//!
//! Terminal front end for `calc_core`:
//!
//! ```text
//! calc_cli eval '{"type": "percentage_of", "part": 30, "total": 120}'
//! calc_cli eval --file request.json
//! calc_cli formulas
//! calc_cli pools
//! calc_cli quiz capitales_es --count 5 --seed 42
//! calc_cli roman 1994
//! ```

mod logger;
mod quiz;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use calc_core::formulas::registry::generate_formula_catalog_markdown;
use calc_core::formulas::roman::{arabic_to_roman, roman_to_arabic};
use calc_core::session::arithmetic::generate_pool;
use calc_core::session::{available_pools, load_pool, SessionConfig};
use calc_core::FormulaRequest;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(name = "calc_cli", version, about = "Calculator engine in the terminal")]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count, help = "More log output (-v info, -vv debug)")]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a JSON formula request and print the JSON result
    Eval {
        #[arg(help = "Request JSON, e.g. '{\"type\": \"circle\", \"radius\": 2}'")]
        json: Option<String>,

        #[arg(short, long, help = "Read the request from a file instead")]
        file: Option<PathBuf>,
    },
    /// Print the formula catalog as markdown
    Formulas,
    /// List the bundled problem pools
    Pools,
    /// Play a timed quiz
    Quiz {
        #[arg(help = "Pool name (see `pools`), or 'arithmetic' for generated questions")]
        pool: String,

        #[arg(short, long, help = "Time limit in seconds")]
        time: Option<u64>,

        #[arg(short, long, help = "Number of questions")]
        count: Option<usize>,

        #[arg(short, long, help = "Seed for a reproducible question order")]
        seed: Option<u64>,

        #[arg(long, default_value_t = 1500, help = "Pause after each answer, in milliseconds")]
        feedback_ms: u64,
    },
    /// Convert between Arabic and Roman numerals
    Roman {
        value: String,
    },
}

fn eval(json: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let source = match (json, file) {
        (Some(json), None) => json,
        (None, Some(path)) => fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?,
        _ => bail!("pass either a JSON argument or --file"),
    };
    let request: FormulaRequest = serde_json::from_str(&source).context("parsing formula request")?;

    match request.evaluate() {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Err(e) => {
            println!("{}", serde_json::to_string_pretty(&e)?);
            std::process::exit(1);
        }
    }
}

fn roman(value: &str) -> Result<()> {
    let result = match value.trim().parse::<i64>() {
        Ok(n) => arabic_to_roman(n),
        Err(_) => roman_to_arabic(value),
    };
    if let Some(error) = &result.error {
        bail!("{}", error);
    }
    println!("{} = {}", result.arabic, result.roman);
    for step in &result.steps {
        println!("  {}", step);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match cli.command {
        Command::Eval { json, file } => eval(json, file)?,
        Command::Formulas => print!("{}", generate_formula_catalog_markdown()),
        Command::Pools => {
            for name in available_pools() {
                let pool = load_pool(&name)?;
                println!("{:<20} {:<3} {:>3}  {}", name, pool.locale.to_string(), pool.len(), pool.title);
            }
            println!("{:<20} {:<3} {:>3}  {}", "arithmetic", "-", "∞", "Generated mental math");
        }
        Command::Quiz {
            pool,
            time,
            count,
            seed,
            feedback_ms,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let mut config = SessionConfig::default().with_feedback_delay(feedback_ms);
            if let Some(count) = count {
                config = config.with_question_count(count);
            }
            config.validate()?;

            let mut pool = if pool == "arithmetic" {
                generate_pool(config.question_count, 12, &mut rng)?
            } else {
                load_pool(&pool)?
            };
            // Command-line time limit beats the pool's own
            if let Some(secs) = time {
                if secs == 0 {
                    bail!("--time must be at least 1 second");
                }
                pool.time_limit_secs = Some(secs);
            }
            quiz::run(pool, config, rng)?;
        }
        Command::Roman { value } => roman(&value)?,
    }

    Ok(())
}
