pub mod bs_analytic;
pub mod sample_stats;
