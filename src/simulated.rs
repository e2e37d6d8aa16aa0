use std::time::Duration;

use crossbeam_channel::TryRecvError;

use crate::result::{BoardError, BoardResult};
use crate::source::{DeviceEvent, DeviceSource, TrackedEvent};

/// Producer side of a `SimulatedSource`.
///
/// Dropping the handle counts as losing the connection of every board the
/// source still tracks.
pub struct SimulatedHandle {
    announcements: crossbeam_channel::Sender<usize>,
    events: crossbeam_channel::Sender<TrackedEvent>,
}

impl SimulatedHandle {
    /// Makes the board in `slot` discoverable.
    ///
    /// # Errors
    ///
    /// This function will return an error if the source has been dropped.
    pub fn announce(&self, slot: usize) -> BoardResult<()> {
        self.announcements
            .send(slot)
            .map_err(|_| BoardError::Disconnected)
    }

    /// Queues an event for the board in `slot`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the source has been dropped.
    pub fn send(&self, slot: usize, event: DeviceEvent) -> BoardResult<()> {
        self.events
            .send(TrackedEvent { slot, event })
            .map_err(|_| BoardError::Disconnected)
    }
}

/// A scripted `DeviceSource` with no hardware behind it.
///
/// Boards are announced and their events queued through a `SimulatedHandle`,
/// typically from a producer thread or ahead of time in a test. Events for
/// slots that are not connected are dropped, like a transport would drop
/// reports from unpaired devices.
pub struct SimulatedSource {
    announcements: crossbeam_channel::Receiver<usize>,
    events: crossbeam_channel::Receiver<TrackedEvent>,
    present: Vec<bool>,
    connected: Vec<bool>,
    refuse_connections: bool,
}

impl SimulatedSource {
    /// Creates a source tracking up to `max_devices` boards and the handle
    /// that feeds it. Announcements for slots at or above `max_devices`
    /// are ignored.
    #[must_use]
    pub fn new(max_devices: usize) -> (Self, SimulatedHandle) {
        let (announcement_sender, announcements) = crossbeam_channel::unbounded();
        let (event_sender, events) = crossbeam_channel::unbounded();

        let source = Self {
            announcements,
            events,
            present: vec![false; max_devices],
            connected: vec![false; max_devices],
            refuse_connections: false,
        };
        let handle = SimulatedHandle {
            announcements: announcement_sender,
            events: event_sender,
        };
        (source, handle)
    }

    /// Makes subsequent `connect` calls connect to nothing, to exercise
    /// connection failure handling.
    pub fn refuse_connections(&mut self) {
        self.refuse_connections = true;
    }

    fn mark_present(&mut self, slot: usize) {
        if let Some(present) = self.present.get_mut(slot) {
            *present = true;
        }
    }
}

impl DeviceSource for SimulatedSource {
    fn discover(&mut self, timeout: Duration) -> BoardResult<usize> {
        // Wait for the first announcement, then take whatever else has
        // queued up in the meantime.
        match self.announcements.recv_timeout(timeout) {
            Ok(slot) => self.mark_present(slot),
            Err(_) => return Ok(0),
        }
        while let Ok(slot) = self.announcements.try_recv() {
            self.mark_present(slot);
        }
        Ok(self.present.iter().filter(|present| **present).count())
    }

    fn connect(&mut self) -> BoardResult<usize> {
        if self.refuse_connections {
            return Ok(0);
        }
        self.connected.copy_from_slice(&self.present);
        Ok(self.connected.iter().filter(|connected| **connected).count())
    }

    fn any_connected(&self) -> bool {
        self.connected.iter().any(|connected| *connected)
    }

    fn poll(&mut self, events: &mut Vec<TrackedEvent>) -> bool {
        let mut any = false;
        loop {
            match self.events.try_recv() {
                Ok(tracked) => {
                    if !self.connected.get(tracked.slot).copied().unwrap_or(false) {
                        continue;
                    }
                    if matches!(
                        tracked.event,
                        DeviceEvent::Disconnect | DeviceEvent::ConnectionLost
                    ) {
                        self.connected[tracked.slot] = false;
                    }
                    events.push(tracked);
                    any = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // The producer is gone, every remaining board loses its
                    // connection.
                    for (slot, connected) in self.connected.iter_mut().enumerate() {
                        if *connected {
                            *connected = false;
                            events.push(TrackedEvent {
                                slot,
                                event: DeviceEvent::ConnectionLost,
                            });
                            any = true;
                        }
                    }
                    break;
                }
            }
        }
        any
    }

    fn cleanup(&mut self) {
        self.present.fill(false);
        self.connected.fill(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::SensorFrame;

    #[test]
    fn test_discover_times_out_without_announcement() {
        let (mut source, _handle) = SimulatedSource::new(1);
        let found = source.discover(Duration::from_millis(1)).unwrap();
        assert_eq!(found, 0);
    }

    #[test]
    fn test_discover_counts_each_board_once() {
        let (mut source, handle) = SimulatedSource::new(4);
        handle.announce(0).unwrap();
        handle.announce(2).unwrap();
        handle.announce(0).unwrap();
        handle.announce(7).unwrap(); // out of range, ignored

        let found = source.discover(Duration::from_millis(100)).unwrap();
        assert_eq!(found, 2);
        assert_eq!(source.connect().unwrap(), 2);
        assert!(source.any_connected());
    }

    #[test]
    fn test_poll_marks_disconnected_board() {
        let (mut source, handle) = SimulatedSource::new(1);
        handle.announce(0).unwrap();
        source.discover(Duration::from_millis(100)).unwrap();
        source.connect().unwrap();

        handle
            .send(
                0,
                DeviceEvent::Frame {
                    calibrated: SensorFrame::new(10.0, 10.0, 10.0, 10.0),
                    raw: None,
                },
            )
            .unwrap();
        handle.send(0, DeviceEvent::Disconnect).unwrap();

        let mut events = Vec::new();
        assert!(source.poll(&mut events));
        assert_eq!(events.len(), 2);
        assert!(!source.any_connected());
    }

    #[test]
    fn test_dropped_handle_loses_connections() {
        let (mut source, handle) = SimulatedSource::new(2);
        handle.announce(0).unwrap();
        handle.announce(1).unwrap();
        source.discover(Duration::from_millis(100)).unwrap();
        source.connect().unwrap();
        drop(handle);

        let mut events = Vec::new();
        assert!(source.poll(&mut events));
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .all(|tracked| matches!(tracked.event, DeviceEvent::ConnectionLost)));
        assert!(!source.any_connected());
    }

    #[test]
    fn test_send_after_source_dropped() {
        let (source, handle) = SimulatedSource::new(1);
        drop(source);

        let result = handle.announce(0);
        assert!(matches!(result, Err(BoardError::Disconnected)));
    }
}
