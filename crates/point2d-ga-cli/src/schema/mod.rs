pub mod convergence;
pub mod run_record;
