pub mod builder;
pub mod defaults;
pub mod file;

pub use builder::{FitSettings, build_cavity_config, build_fit_settings, load_file_config};
