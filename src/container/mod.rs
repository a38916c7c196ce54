pub mod chunks;

pub use chunks::*;
