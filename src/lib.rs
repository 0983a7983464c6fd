//! Synthetic composite sync waveforms for circuit simulation.
//!
//! A frame is described as a plan of named segments (sync pulses, blank lines, display lines),
//! laid out on an absolute timeline, overlaid with stepped gray levels during active video, and
//! merged into one strictly increasing breakpoint list that a simulator's piecewise linear source
//! can read.
//!
//! ```no_run
//! use sync_pwl::{plf, signal::SignalGenerator};
//!
//! let generation = SignalGenerator::pal()?.generate()?;
//! plf::write_plf("pal.plf", &generation.sequence)?;
//! # Ok::<(), sync_pwl::error::SignalError>(())
//! ```

pub mod config;
pub mod error;
pub mod plf;
pub mod plot;
pub mod signal;
pub mod types;

pub use config::{RepairEpsilon, Scan, SignalConfig};
pub use error::{SignalError, SignalResult};
pub use signal::{FinalSequence, Generation, SignalGenerator, VideoMatrix};
