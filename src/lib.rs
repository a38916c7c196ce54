pub mod analysis;
pub mod config;
pub mod container;
pub mod decode;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod raster;
pub mod request;

pub use analysis::*;
pub use container::*;
pub use decode::*;
pub use error::*;
pub use raster::*;
