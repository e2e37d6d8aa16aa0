use std::time::Duration;

use bitflags::bitflags;

use crate::result::BoardResult;
use crate::scale::SensorFrame;

bitflags! {
    #[derive(Debug, Clone, Copy)]
    pub struct StatusFlags: u8 {
        const BATTERY_LOW = 0b0000_0001;
        const SPEAKER_ENABLED = 0b0000_0100;
        const LED_1 = 0b0001_0000;
        const LED_2 = 0b0010_0000;
        const LED_3 = 0b0100_0000;
        const LED_4 = 0b1000_0000;
    }
}

/// Status fields reported by a balance board.
#[derive(Debug, Clone)]
pub struct DeviceStatus {
    pub flags: StatusFlags,
    pub battery_level: u8,
}

impl DeviceStatus {
    /// Number of battery bars (0 to 4) for the current battery level.
    /// - `0x00`: empty
    /// - `0x01` to `0x0E`: 1 bar
    /// - `0x0F` to `0x13`: 2 bars
    /// - `0x14` to `0x18`: 3 bars
    /// - `0x19` or greater: 4 bars
    #[must_use]
    pub const fn battery_bars(&self) -> u8 {
        match self.battery_level {
            0x00 => 0,
            0x01..=0x0E => 1,
            0x0F..=0x13 => 2,
            0x14..=0x18 => 3,
            _ => 4,
        }
    }
}

/// The uncalibrated strain-gauge counts of the four corners.
///
/// Sources that expose them carry these alongside the calibrated frame so
/// reports can show both.
#[derive(Debug, Clone, Copy)]
pub struct RawFrame {
    pub top_left: u16,
    pub top_right: u16,
    pub bottom_left: u16,
    pub bottom_right: u16,
}

/// An event produced by a tracked balance board.
#[derive(Debug)]
pub enum DeviceEvent {
    /// A new sensor snapshot.
    Frame {
        calibrated: SensorFrame,
        raw: Option<RawFrame>,
    },
    /// A status report (battery, LEDs, speaker).
    Status(DeviceStatus),
    /// The board reported an orderly disconnect.
    Disconnect,
    /// The connection dropped without a disconnect report.
    ConnectionLost,
}

/// A `DeviceEvent` tagged with the slot of the board that produced it.
#[derive(Debug)]
pub struct TrackedEvent {
    pub slot: usize,
    pub event: DeviceEvent,
}

/// Access to balance board devices.
///
/// The number of tracked slots is fixed when the source is constructed.
/// Implementations clear a slot's connected state before yielding its
/// `Disconnect` or `ConnectionLost` event, so a poll loop conditioned on
/// `any_connected` terminates once every board is gone.
pub trait DeviceSource {
    /// Scans for balance boards until at least one is found or the timeout
    /// expires. Returns the number of discovered boards.
    ///
    /// # Errors
    ///
    /// This function will return an error if the scan itself fails, not
    /// when no board shows up.
    fn discover(&mut self, timeout: Duration) -> BoardResult<usize>;

    /// Connects to the discovered boards. Returns the number of connected
    /// boards.
    ///
    /// # Errors
    ///
    /// This function will return an error if establishing connections
    /// fails entirely.
    fn connect(&mut self) -> BoardResult<usize>;

    /// Whether any board is still connected.
    fn any_connected(&self) -> bool;

    /// Drains pending device events into `events`.
    /// Returns `true` if any event was produced this cycle.
    fn poll(&mut self, events: &mut Vec<TrackedEvent>) -> bool;

    /// Releases all tracked boards.
    fn cleanup(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_bars() {
        let status = |battery_level| DeviceStatus {
            flags: StatusFlags::empty(),
            battery_level,
        };

        assert_eq!(status(0x00).battery_bars(), 0);
        assert_eq!(status(0x0E).battery_bars(), 1);
        assert_eq!(status(0x13).battery_bars(), 2);
        assert_eq!(status(0x18).battery_bars(), 3);
        assert_eq!(status(0x19).battery_bars(), 4);
        assert_eq!(status(0xFF).battery_bars(), 4);
    }
}
