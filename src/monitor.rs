use std::io::Write;
use std::thread;
use std::time::Duration;

use crate::format::OutputFormat;
use crate::result::{BoardError, BoardResult};
use crate::scale::WeightFormula;
use crate::source::{DeviceEvent, DeviceSource, TrackedEvent};

/// Default time to wait for a board to show up during discovery.
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);
/// Default sleep after a poll cycle that produced no event.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Drives the discover, connect, poll, cleanup lifecycle of a device
/// source, derives a measurement from every frame and hands it to the
/// output format.
pub struct BoardMonitor<S, F> {
    source: S,
    format: F,
    formula: WeightFormula,
    discovery_timeout: Duration,
    poll_interval: Duration,
}

impl<S: DeviceSource, F: OutputFormat> BoardMonitor<S, F> {
    #[must_use]
    pub fn new(source: S, format: F, formula: WeightFormula) -> Self {
        Self {
            source,
            format,
            formula,
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets the time `run` waits for the first board to be discovered.
    pub fn set_discovery_timeout(&mut self, timeout: Duration) {
        self.discovery_timeout = timeout;
    }

    /// Sets the sleep after poll cycles that produced no event.
    /// `Duration::ZERO` polls without sleeping.
    pub fn set_poll_interval(&mut self, interval: Duration) {
        self.poll_interval = interval;
    }

    /// Runs until every board has disconnected.
    ///
    /// Frames whose measurement fails are logged and skipped, they never
    /// stop the loop.
    ///
    /// # Errors
    ///
    /// This function will return `DeviceNotFound` when discovery comes up
    /// empty, `ConnectionFailed` when no board accepts a connection, and
    /// `Io` when the output sink fails.
    pub fn run(&mut self, out: &mut impl Write) -> BoardResult<()> {
        let found = self.source.discover(self.discovery_timeout)?;
        if found == 0 {
            return Err(BoardError::DeviceNotFound);
        }
        tracing::info!(found, "discovered balance boards");

        let connected = self.source.connect()?;
        if connected == 0 {
            return Err(BoardError::ConnectionFailed);
        }
        tracing::info!(connected, "connected to balance boards");

        let mut events = Vec::new();
        while self.source.any_connected() {
            if self.source.poll(&mut events) {
                for tracked in events.drain(..) {
                    self.handle_event(tracked, out)?;
                }
            } else if !self.poll_interval.is_zero() {
                thread::sleep(self.poll_interval);
            }
        }

        self.source.cleanup();
        Ok(())
    }

    fn handle_event(&self, tracked: TrackedEvent, out: &mut impl Write) -> BoardResult<()> {
        let TrackedEvent { slot, event } = tracked;
        match event {
            DeviceEvent::Frame { calibrated, raw } => match self.formula.measure(&calibrated) {
                Ok(measurement) => {
                    self.format
                        .write_measurement(out, slot, &measurement, &calibrated, raw.as_ref())?;
                }
                Err(error) => tracing::warn!(slot, ?error, "skipping frame"),
            },
            DeviceEvent::Status(status) => self.format.write_status(out, slot, &status)?,
            DeviceEvent::Disconnect => tracing::info!(slot, "balance board disconnected"),
            DeviceEvent::ConnectionLost => tracing::warn!(slot, "balance board connection lost"),
        }
        Ok(())
    }
}
