// scripts/convergence.rs
use anyhow::Context;
use bsm_pricer::analytics::bs_analytic::price_call_bs_params;
use bsm_pricer::analytics::sample_stats::SampleSummary;
use bsm_pricer::math_utils::Timer;
use bsm_pricer::mc::convergence::{convergence_study, ConvergenceConfig};
use bsm_pricer::mc::mc_engine::mc_price_call_gbm;
use bsm_pricer::mc::payoffs::Payoff;
use bsm_pricer::output;
use bsm_pricer::rng::seed_rng_from_u64;
use bsm_pricer::{simulate_terminal_prices, McConfig, ModelParams};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Compare Monte Carlo and closed-form Black-Scholes call prices
#[derive(Debug, Parser)]
#[command(name = "convergence", version)]
struct Args {
    /// Spot price
    #[arg(long, default_value_t = 100.0)]
    s0: f64,
    /// Risk-free rate (annualized)
    #[arg(long, default_value_t = 0.03)]
    r: f64,
    /// Volatility (annualized)
    #[arg(long, default_value_t = 0.4)]
    sigma: f64,
    /// Time to expiry in years
    #[arg(long, default_value_t = 0.25)]
    t: f64,
    /// Strike
    #[arg(long, default_value_t = 105.0)]
    k: f64,
    /// Paths for the headline Monte Carlo run
    #[arg(long, default_value_t = 1_000_000)]
    paths: usize,
    /// Path counts for the convergence table
    #[arg(long, value_delimiter = ',', default_values_t = vec![100usize, 10_000, 1_000_000])]
    levels: Vec<usize>,
    /// Independent runs per convergence level
    #[arg(long, default_value_t = 20)]
    repetitions: usize,
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Write timestamped CSVs of the terminal price sample and convergence table
    #[arg(long)]
    csv: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let params = ModelParams::new(args.s0, args.r, args.sigma, args.t, args.k);

    println!("bsm-pricer Monte Carlo vs Black-Scholes");
    println!("=======================================\n");
    println!("  CPU Cores: {}", num_cpus::get());
    println!("  Rayon Threads: {}", rayon::current_num_threads());
    println!(
        "  S0={} r={} sigma={} T={} K={}\n",
        params.s0, params.r, params.sigma, params.t, params.k
    );

    let exact = price_call_bs_params(&params).context("closed-form price")?;

    let mut timer = Timer::new();
    timer.start();
    let estimate = mc_price_call_gbm(&McConfig {
        paths: args.paths,
        seed: args.seed,
        params,
    })
    .context("monte carlo price")?;
    let time_ms = timer.elapsed_ms();
    let (lo, hi) = estimate.confidence_interval(1.96);

    println!("Closed form:  {:.6}", exact);
    println!(
        "Monte Carlo:  {:.6} ± {:.6}  (95% CI [{:.4}, {:.4}], {} paths, {:.1} ms)",
        estimate.price, estimate.std_error, lo, hi, estimate.paths, time_ms
    );

    let cfg = ConvergenceConfig {
        path_counts: args.levels,
        repetitions: args.repetitions,
        seed: args.seed,
        params,
    };
    let points = convergence_study(&cfg).context("convergence study")?;

    println!("\n{:=<72}", "");
    println!(
        "{:>10} {:>12} {:>14} {:>12} {:>12} {:>8}",
        "Paths", "Mean Price", "Mean |Error|", "Std Dev", "Mean SE", "Ratio"
    );
    println!("{:-<72}", "");
    for (i, p) in points.iter().enumerate() {
        let ratio = if i == 0 {
            "-".to_string()
        } else {
            format!("{:.2}", points[i - 1].std_dev / p.std_dev)
        };
        println!(
            "{:>10} {:>12.6} {:>14.6} {:>12.6} {:>12.6} {:>8}",
            p.paths, p.mean_price, p.mean_abs_error, p.std_dev, p.mean_std_error, ratio
        );
    }
    println!("{:=<72}", "");

    let mut rng = seed_rng_from_u64(args.seed);
    let sample = simulate_terminal_prices(params.s0, params.r, params.sigma, params.t, 10_000, &mut rng)
        .context("terminal price sample")?;
    let summary = SampleSummary::from_sample(&sample)?;
    println!(
        "\nTerminal price sample (10k): mean {:.4} (forward {:.4}), std {:.4}, min {:.4}, max {:.4}",
        summary.mean,
        params.forward(),
        summary.std_dev,
        summary.min,
        summary.max
    );

    if args.csv {
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let sample_file = format!("terminal_prices_{}.csv", timestamp);
        let convergence_file = format!("convergence_{}.csv", timestamp);
        let summary_file = format!("summary_{}.csv", timestamp);

        output::write_terminal_prices_to_csv(&sample_file, &sample, &Payoff::EuropeanCall { k: params.k })
            .with_context(|| format!("writing {}", sample_file))?;
        output::write_convergence_to_csv(&convergence_file, &points)
            .with_context(|| format!("writing {}", convergence_file))?;
        output::write_summary_to_csv(
            &summary_file,
            &[
                ("closed_form", exact.to_string()),
                ("mc_price", estimate.price.to_string()),
                ("mc_std_error", estimate.std_error.to_string()),
                ("paths", estimate.paths.to_string()),
                ("seed", args.seed.to_string()),
            ],
        )
        .with_context(|| format!("writing {}", summary_file))?;

        println!("\nResults written to {}, {} and {}", sample_file, convergence_file, summary_file);
    }

    Ok(())
}
