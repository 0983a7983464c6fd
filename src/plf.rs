//! PLF output, the breakpoint list format read by a simulator's piecewise linear source.
//!
//! One breakpoint per line, `<time> <voltage>`, time in scientific notation with 12 digits after
//! the point and a C style exponent, voltage fixed point with 6 digits. No header.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use log::info;
use tempfile::NamedTempFile;
use crate::error::SignalResult;
use crate::signal::FinalSequence;
use crate::types::{SampleTime, SampleValue};

/// Format a time like printf's `%.12e`, which always writes the exponent sign and at least two
/// exponent digits.
pub fn format_time(time: SampleTime) -> String {
    let formatted = format!("{:.12e}", time);
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return formatted;
    };

    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exponent.abs())
}

/// Format one breakpoint as a PLF line, including the newline.
pub fn format_plf_line(time: SampleTime, value: SampleValue) -> String {
    format!("{} {:.6}\n", format_time(time), value)
}

/// Write the sequence to any writer.
pub fn write_plf_to<W: Write>(writer: &mut W, sequence: &FinalSequence) -> SignalResult<()> {
    for &(time, value) in sequence {
        writer.write_all(format_plf_line(time, value).as_bytes())?;
    }

    Ok(())
}

/// Write the sequence to a file. The data goes to a temporary file next to the destination first
/// and is renamed into place once complete, so a failed write never leaves a truncated file.
pub fn write_plf(path: impl AsRef<Path>, sequence: &FinalSequence) -> SignalResult<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        write_plf_to(&mut writer, sequence)?;
        writer.flush()?;
    }
    file.persist(path).map_err(|err| err.error)?;

    info!("wrote {} breakpoints to {}", sequence.len(), path.display());
    Ok(())
}

/// Read a PLF file back into breakpoints. Blank lines are skipped.
pub fn read_plf(path: impl AsRef<Path>) -> SignalResult<Vec<(SampleTime, SampleValue)>> {
    let text = fs::read_to_string(path)?;
    let mut points = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let mut fields = line.split_whitespace();
        let (Some(time), Some(value)) = (fields.next(), fields.next()) else {
            continue;
        };
        let parse = |field: &str| {
            field.parse::<f64>().map_err(|err| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("line {}: bad number '{}': {}", idx + 1, field, err),
                )
            })
        };
        points.push((parse(time)?, parse(value)?));
    }

    Ok(points)
}
