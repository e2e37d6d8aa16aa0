//! Streams balance board weight readings to stdout as
//! `data,<total>,<left>,<right>` lines in pounds, tracking up to four
//! boards with a 25 second discovery window and the bottom-right offset
//! correction applied.

use std::io;
use std::thread;
use std::time::Duration;

use balanceboard_rs::format::CsvFormat;
use balanceboard_rs::prelude::*;

const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(25);

fn main() -> BoardResult<()> {
    tracing_subscriber::fmt()
        .compact()
        .with_writer(io::stderr)
        .init();

    let (source, board) = SimulatedSource::new(BOARD_DEFAULT_MAX_DEVICES);
    thread::spawn(move || weigh_in_session(&board));

    let mut monitor = BoardMonitor::new(source, CsvFormat, WeightFormula::OffsetCorrected);
    monitor.set_discovery_timeout(DISCOVERY_TIMEOUT);
    monitor.run(&mut io::stdout().lock())
}

/// Replays a scripted weigh-in on slot 0 so the tracker has data without
/// real hardware. A transport-backed `DeviceSource` would replace this.
fn weigh_in_session(board: &SimulatedHandle) {
    const STEPS: u32 = 60;
    const BODY_WEIGHT_KG: f32 = 72.5;

    if board.announce(0).is_err() {
        return;
    }

    // Load ramps up over the first ten frames, then wobbles between the
    // left and right side while the person balances.
    for step in 0..=STEPS {
        let load = BODY_WEIGHT_KG * f32::min(1.0, step as f32 / 10.0);
        let shift = 0.05 * (step as f32 * 0.7).sin();
        let frame = distribute(load, shift);
        let event = DeviceEvent::Frame {
            calibrated: frame,
            raw: None,
        };
        if board.send(0, event).is_err() {
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }

    let _ = board.send(0, DeviceEvent::Disconnect);
}

/// Spreads `load` kilograms over the four corners, moving `shift` of the
/// total from the left to the right side.
fn distribute(load: f32, shift: f32) -> SensorFrame {
    let left = load * (0.5 - shift);
    let right = load * (0.5 + shift);
    SensorFrame::new(left * 0.5, right * 0.5, left * 0.5, right * 0.5)
}
