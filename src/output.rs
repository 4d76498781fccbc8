// src/output.rs
use crate::mc::convergence::ConvergencePoint;
use crate::mc::payoffs::Payoff;
use ndarray::Array1;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// One row per simulated terminal price, with its payoff.
pub fn write_terminal_prices_to_csv<P: AsRef<Path>>(
    filename: P,
    terminal_prices: &Array1<f64>,
    payoff: &Payoff,
) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    writeln!(file, "path_id,s_t,payoff")?;
    for (i, &s_t) in terminal_prices.iter().enumerate() {
        writeln!(file, "{},{},{}", i, s_t, payoff.calculate(s_t))?;
    }
    file.flush()
}

pub fn write_convergence_to_csv<P: AsRef<Path>>(
    filename: P,
    points: &[ConvergencePoint],
) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    writeln!(
        file,
        "paths,repetitions,reference_price,mean_price,mean_abs_error,std_dev,mean_std_error"
    )?;
    for p in points {
        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            p.paths,
            p.repetitions,
            p.reference_price,
            p.mean_price,
            p.mean_abs_error,
            p.std_dev,
            p.mean_std_error
        )?;
    }
    file.flush()
}

pub fn write_summary_to_csv<P: AsRef<Path>>(
    filename: P,
    summary_data: &[(&str, String)],
) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    for (key, value) in summary_data {
        writeln!(file, "{},{}", key, value)?;
    }
    file.flush()
}
