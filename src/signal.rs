mod segment;
mod plan;
mod timeline;
mod overlay;
mod merge;
mod standard;
mod generator;

pub use segment::*;
pub use plan::*;
pub use timeline::*;
pub use overlay::*;
pub use merge::*;
pub use standard::*;
pub use generator::*;
