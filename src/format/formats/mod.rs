//! Annotation format implementations.

mod full;
mod pivots;

#[cfg(test)]
mod tests;

pub use full::FullFormat;
pub use pivots::PivotsFormat;
