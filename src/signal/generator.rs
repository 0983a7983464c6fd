use log::debug;
use crate::config::{RepairEpsilon, SignalConfig};
use crate::error::{SignalError, SignalResult};
use crate::signal::{
    assemble, merge, overlay, pal_library, pal_plan, vga_library, vga_plan, FinalSequence,
    OverlayTimeline, SegmentLibrary, SequencePlan, Timeline, VideoMatrix,
};
use crate::types::SampleTime;

/// Everything one generation pass produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub timeline: Timeline,
    pub overlay: OverlayTimeline,
    pub sequence: FinalSequence,
}

/// The signal generator, turns a segment library, a frame plan and a video matrix into the final
/// breakpoint sequence for one frame. Generating doesn't change anything, so it can be called
/// again after swapping the video matrix.
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    config: SignalConfig,
    library: SegmentLibrary,
    plan: SequencePlan,
    matrix: VideoMatrix,
}

impl SignalGenerator {
    /// Create a generator showing the default gray bands.
    pub fn new(config: SignalConfig, library: SegmentLibrary, plan: SequencePlan) -> SignalResult<Self> {
        config.validate()?;
        plan.check(&library)?;

        let matrix = VideoMatrix::gray_bands(
            config.horizontal_resolution,
            config.vertical_resolution,
            config.black_level,
            config.white_level,
        );

        Ok(Self {
            config,
            library,
            plan,
            matrix,
        })
    }

    /// A generator for one interlaced PAL frame.
    pub fn pal() -> SignalResult<Self> {
        Self::pal_with(SignalConfig::pal())
    }

    /// A PAL frame with custom constants.
    pub fn pal_with(config: SignalConfig) -> SignalResult<Self> {
        config.validate()?;
        let library = pal_library(&config)?;
        let plan = pal_plan(&library)?;
        Self::new(config, library, plan)
    }

    /// A generator for one 640x480 VGA frame.
    pub fn vga() -> SignalResult<Self> {
        Self::vga_with(SignalConfig::vga())
    }

    /// A VGA frame with custom constants.
    pub fn vga_with(config: SignalConfig) -> SignalResult<Self> {
        config.validate()?;
        let library = vga_library(&config)?;
        let plan = vga_plan(&library, &config)?;
        Self::new(config, library, plan)
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    pub fn library(&self) -> &SegmentLibrary {
        &self.library
    }

    pub fn plan(&self) -> &SequencePlan {
        &self.plan
    }

    pub fn video_matrix(&self) -> &VideoMatrix {
        &self.matrix
    }

    /// Replace the video matrix. It must have as many samples and lines as the configuration and
    /// only hold levels between black and white. An empty matrix, with no samples, is always
    /// accepted and turns active video off.
    pub fn set_video_matrix(&mut self, matrix: VideoMatrix) -> SignalResult<()> {
        let samples = matrix.horizontal_resolution();
        if samples != 0 && samples != self.config.horizontal_resolution {
            return Err(SignalError::InvalidVideoMatrix {
                reason: format!(
                    "matrix has {} samples per line, the signal uses {}",
                    samples, self.config.horizontal_resolution
                ),
            });
        }
        if matrix.vertical_resolution() != self.config.vertical_resolution {
            return Err(SignalError::InvalidVideoMatrix {
                reason: format!(
                    "matrix has {} lines, the signal addresses {}",
                    matrix.vertical_resolution(),
                    self.config.vertical_resolution
                ),
            });
        }
        matrix.validate(&self.config)?;

        self.matrix = matrix;
        Ok(())
    }

    /// The step used to separate coincident timestamps.
    pub fn epsilon(&self) -> SampleTime {
        match self.config.repair_epsilon {
            RepairEpsilon::Absolute(step) => step,
            RepairEpsilon::Relative(fraction) => {
                let base = self.library.shortest_duration().unwrap_or(self.config.line_period);
                base * fraction
            }
        }
    }

    /// Generate one frame.
    pub fn generate(&self) -> SignalResult<Generation> {
        let instances = self.plan.expand(&self.library, &self.config)?;
        let timeline = assemble(&instances);
        let overlay = overlay(&instances, &timeline, &self.matrix, &self.config);
        let epsilon = self.epsilon();
        let sequence = merge(timeline.points(), overlay.points(), epsilon)?;

        debug!(
            "generated {} instances, {} timeline + {} overlay points, {} merged over {:e}s (epsilon {:e}s)",
            instances.len(),
            timeline.len(),
            overlay.len(),
            sequence.len(),
            timeline.end(),
            epsilon
        );

        Ok(Generation {
            timeline,
            overlay,
            sequence,
        })
    }
}
