#![allow(clippy::module_name_repetitions)]

pub mod format;
mod monitor;
mod result;
pub mod scale;
pub mod simulated;
pub mod source;

pub const BOARD_DEFAULT_MAX_DEVICES: usize = 4;

pub mod prelude {
    pub use crate::format::{CsvFormat, OutputFormat, ReportFormat};
    pub use crate::monitor::{BoardMonitor, DEFAULT_DISCOVERY_TIMEOUT, DEFAULT_POLL_INTERVAL};
    pub use crate::result::*;
    pub use crate::scale::{
        CenterOfPressure, Measurement, SensorFrame, WeightFormula, BOTTOM_RIGHT_OFFSET_LB,
        KG_TO_LB,
    };
    pub use crate::simulated::{SimulatedHandle, SimulatedSource};
    pub use crate::source::*;
    pub use crate::BOARD_DEFAULT_MAX_DEVICES;
}
