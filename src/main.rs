use std::error::Error;
use log::info;
use sync_pwl::config::PAL_LINE_PERIOD;
use sync_pwl::plf::write_plf;
use sync_pwl::plot::{save_plot, PlotStyle};
use sync_pwl::signal::SignalGenerator;
use sync_pwl::types::SignalFloat;

/// Where the breakpoint list goes.
const OUTPUT_PLF: &str = "pal_frame.plf";

/// Where the whole frame plot goes.
const OUTPUT_PLOT: &str = "pal_frame.png";

/// Where the close-up of the first display lines goes.
const OUTPUT_DETAIL_PLOT: &str = "pal_lines.png";

/// The plot width in pixels.
const PLOT_WIDTH: u32 = 1500;

/// The plot height in pixels.
const PLOT_HEIGHT: u32 = 500;

/// The close-up starts at the first display line of the first field and spans three lines.
const DETAIL_START: SignalFloat = 24.5 * PAL_LINE_PERIOD;
const DETAIL_LENGTH: SignalFloat = 3.0 * PAL_LINE_PERIOD;

/// Generate one PAL frame, write it out and plot it.
fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging.
    env_logger::init();

    let generator = SignalGenerator::pal()?;
    let generation = generator.generate()?;
    info!(
        "PAL frame: {} breakpoints over {:e}s",
        generation.sequence.len(),
        generation.sequence.duration()
    );

    write_plf(OUTPUT_PLF, &generation.sequence)?;

    save_plot(OUTPUT_PLOT, &generation.sequence, PLOT_WIDTH, PLOT_HEIGHT, &PlotStyle::default())?;

    let detail = PlotStyle {
        window: Some((DETAIL_START, DETAIL_START + DETAIL_LENGTH)),
        ..PlotStyle::default()
    };
    save_plot(OUTPUT_DETAIL_PLOT, &generation.sequence, PLOT_WIDTH, PLOT_HEIGHT, &detail)?;

    Ok(())
}
