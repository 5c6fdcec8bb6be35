pub mod client;

pub use client::OrsClient;
