pub mod client;
pub mod feed;

pub use client::*;
pub use feed::*;
