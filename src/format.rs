use std::io::{self, Write};

use crate::scale::{Measurement, SensorFrame};
use crate::source::{DeviceStatus, RawFrame, StatusFlags};

/// Renders measurements and status reports to an output sink.
pub trait OutputFormat {
    /// Writes one measurement together with the frame it was derived from.
    ///
    /// # Errors
    ///
    /// This function will return an error if writing to the sink fails.
    fn write_measurement(
        &self,
        out: &mut dyn Write,
        slot: usize,
        measurement: &Measurement,
        frame: &SensorFrame,
        raw: Option<&RawFrame>,
    ) -> io::Result<()>;

    /// Writes one device status report.
    ///
    /// # Errors
    ///
    /// This function will return an error if writing to the sink fails.
    fn write_status(&self, out: &mut dyn Write, slot: usize, status: &DeviceStatus)
        -> io::Result<()>;
}

/// Machine-readable format, one `data,<total>,<left>,<right>` line per
/// frame with six fractional digits. Status reports are not part of the
/// line protocol and are dropped.
pub struct CsvFormat;

impl OutputFormat for CsvFormat {
    fn write_measurement(
        &self,
        out: &mut dyn Write,
        _slot: usize,
        measurement: &Measurement,
        _frame: &SensorFrame,
        _raw: Option<&RawFrame>,
    ) -> io::Result<()> {
        writeln!(
            out,
            "data,{:.6},{:.6},{:.6}",
            measurement.total, measurement.left, measurement.right
        )
    }

    fn write_status(
        &self,
        _out: &mut dyn Write,
        _slot: usize,
        _status: &DeviceStatus,
    ) -> io::Result<()> {
        Ok(())
    }
}

/// Human-readable multi-line report per frame and status event.
pub struct ReportFormat;

impl OutputFormat for ReportFormat {
    fn write_measurement(
        &self,
        out: &mut dyn Write,
        slot: usize,
        measurement: &Measurement,
        frame: &SensorFrame,
        raw: Option<&RawFrame>,
    ) -> io::Result<()> {
        writeln!(out, "--- balance board {slot} ---")?;
        if let Some(raw) = raw {
            writeln!(
                out,
                "raw:        tl={} tr={} bl={} br={}",
                raw.top_left, raw.top_right, raw.bottom_left, raw.bottom_right
            )?;
        }
        writeln!(
            out,
            "calibrated: tl={:.2}kg tr={:.2}kg bl={:.2}kg br={:.2}kg",
            frame.top_left, frame.top_right, frame.bottom_left, frame.bottom_right
        )?;
        writeln!(
            out,
            "weight:     {:.2}lb (left {:.2}lb, right {:.2}lb)",
            measurement.total, measurement.left, measurement.right
        )?;
        if let Some(center) = measurement.center {
            writeln!(out, "center:     x={:+.3} y={:+.3}", center.x, center.y)?;
        }
        Ok(())
    }

    fn write_status(
        &self,
        out: &mut dyn Write,
        slot: usize,
        status: &DeviceStatus,
    ) -> io::Result<()> {
        writeln!(out, "--- balance board {slot} status ---")?;
        writeln!(
            out,
            "battery:    level={} [{} bars]{}",
            status.battery_level,
            status.battery_bars(),
            if status.flags.contains(StatusFlags::BATTERY_LOW) {
                " (low)"
            } else {
                ""
            }
        )?;
        writeln!(out, "leds:       {}", led_list(status.flags))?;
        writeln!(
            out,
            "speaker:    {}",
            if status.flags.contains(StatusFlags::SPEAKER_ENABLED) {
                "enabled"
            } else {
                "disabled"
            }
        )
    }
}

fn led_list(flags: StatusFlags) -> String {
    let lit: Vec<&str> = [
        (StatusFlags::LED_1, "1"),
        (StatusFlags::LED_2, "2"),
        (StatusFlags::LED_3, "3"),
        (StatusFlags::LED_4, "4"),
    ]
    .iter()
    .filter(|(flag, _)| flags.contains(*flag))
    .map(|(_, name)| *name)
    .collect();

    if lit.is_empty() {
        "off".to_string()
    } else {
        lit.join(" ")
    }
}
