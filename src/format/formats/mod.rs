//! Manifest format implementations.

pub mod createml;
pub mod turi;

#[cfg(test)]
mod tests;

pub use createml::CreateMlFormat;
pub use turi::TuriFormat;
