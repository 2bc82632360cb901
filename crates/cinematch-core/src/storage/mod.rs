pub mod dataset;
pub mod input;

pub use dataset::{incremental_path, load_dataset, save_dataset};
pub use input::{load_input, read_input};
