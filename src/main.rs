use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

use factail::{compute, DEFAULT_FAC_DIGITS};

/// Last five digits of N! before the trailing zeroes.
#[derive(Parser)]
#[command(name = "factail", version, about)]
struct Args {
    /// Upper bound of the factorial.
    n: u64,

    /// Decimal digits retained in the accumulator between multiplies
    /// (1 to 13). Nine suffices for N up to at least 10^10.
    #[arg(long, default_value_t = DEFAULT_FAC_DIGITS)]
    fac_digits: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let tail = compute(args.n, args.fac_digits)?;
    println!("{tail:05}");
    Ok(())
}
