pub mod borders;
pub mod difference;
pub mod grayscale;

pub use borders::*;
pub use difference::*;
pub use grayscale::*;
