//! CLI command implementations.

mod ask;
mod config;
mod doctor;
mod lookup;
mod ocr;
mod tools;

pub use ask::run_ask;
pub use config::run_config;
pub use doctor::run_doctor;
pub use lookup::run_lookup;
pub use ocr::run_ocr;
pub use tools::run_tools;
