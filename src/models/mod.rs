pub mod gbm;
pub mod params;
