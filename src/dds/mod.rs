//! Direct digital synthesis of the two coil waveforms
//!
//! Architecture:
//! - Sine table: built once from (N, R), immutable
//! - Sampler: two phase indices a quarter cycle apart, one step per tick
//! - Output: two DAC channels written every tick

pub mod sampler;
pub mod table;

pub use sampler::{QuadratureOutput, QuadratureSample, WaveformSampler};
pub use table::SineTable;
