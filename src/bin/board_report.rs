//! Prints a human-readable report for every frame of a single balance
//! board: raw strain-gauge counts, calibrated corner weights, pound totals
//! and the normalized center of pressure, plus battery and LED status.

use std::io;
use std::thread;
use std::time::Duration;

use balanceboard_rs::format::ReportFormat;
use balanceboard_rs::prelude::*;

const MAX_DEVICES: usize = 1;
const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

fn main() -> BoardResult<()> {
    tracing_subscriber::fmt()
        .compact()
        .with_writer(io::stderr)
        .init();

    let (source, board) = SimulatedSource::new(MAX_DEVICES);
    thread::spawn(move || weigh_in_session(&board));

    let mut monitor = BoardMonitor::new(source, ReportFormat, WeightFormula::CenterOfPressure);
    monitor.set_discovery_timeout(DISCOVERY_TIMEOUT);
    monitor.run(&mut io::stdout().lock())
}

/// Replays a scripted weigh-in so the report has data without real
/// hardware. A transport-backed `DeviceSource` would replace this.
fn weigh_in_session(board: &SimulatedHandle) {
    const STEPS: u32 = 30;
    const BODY_WEIGHT_KG: f32 = 68.0;

    if board.announce(0).is_err() {
        return;
    }

    let status = DeviceStatus {
        flags: StatusFlags::LED_1,
        battery_level: 0x1B,
    };
    if board.send(0, DeviceEvent::Status(status)).is_err() {
        return;
    }

    // The person leans forward and back while the load settles.
    for step in 1..=STEPS {
        let load = BODY_WEIGHT_KG * f32::min(1.0, step as f32 / 8.0);
        let lean = 0.1 * (step as f32 * 0.4).sin();
        let frame = distribute(load, lean);
        let event = DeviceEvent::Frame {
            calibrated: frame,
            raw: Some(raw_counts(&frame)),
        };
        if board.send(0, event).is_err() {
            return;
        }
        thread::sleep(Duration::from_millis(100));
    }

    let _ = board.send(0, DeviceEvent::Disconnect);
}

/// Spreads `load` kilograms over the four corners, moving `lean` of the
/// total from the bottom to the top edge.
fn distribute(load: f32, lean: f32) -> SensorFrame {
    let top = load * (0.5 + lean);
    let bottom = load * (0.5 - lean);
    SensorFrame::new(top * 0.5, top * 0.5, bottom * 0.5, bottom * 0.5)
}

/// Fakes the strain-gauge counts a board would report for a calibrated
/// frame.
fn raw_counts(frame: &SensorFrame) -> RawFrame {
    fn count(kg: f32) -> u16 {
        (8000.0 + kg * 150.0) as u16
    }

    RawFrame {
        top_left: count(frame.top_left),
        top_right: count(frame.top_right),
        bottom_left: count(frame.bottom_left),
        bottom_right: count(frame.bottom_right),
    }
}
