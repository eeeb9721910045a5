pub mod client;
pub mod filter;
pub mod refresh;

pub use client::*;
pub use filter::*;
pub use refresh::*;
