mod run_mts;

pub use test_runner::run;
