pub mod migrator;
pub mod params;

pub use migrator::*;
pub use params::*;
