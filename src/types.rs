/// The floating point type to use for signal calculations. Unlike a sampled signal, the breakpoint
/// times here are absolute instants across a 40ms frame and are written out with 12 significant
/// digits, while the sub-intervals between them can be a few nanoseconds wide. f32 can't hold that
/// much dynamic range, so this has to stay f64.
pub type SignalFloat = f64;

/// The instant a breakpoint sits at, in seconds.
pub type SampleTime = SignalFloat;

/// The voltage of a breakpoint.
pub type SampleValue = SignalFloat;

/// A single (time, voltage) breakpoint, either relative to the start of a segment or absolute
/// within a frame depending on where it's stored.
pub type Breakpoint = (SampleTime, SampleValue);
