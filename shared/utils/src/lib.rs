pub mod analysis;
pub mod cbom;
pub mod config;
pub mod error;
pub mod logging;
pub mod validation;

pub use analysis::*;
pub use cbom::*;
pub use self::config::*;
pub use error::*;
pub use logging::*;
pub use validation::*;
