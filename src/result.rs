#[derive(Debug)]
pub enum BoardError {
    Io(std::io::Error),
    Measurement(MeasurementError),
    DeviceNotFound,
    ConnectionFailed,
    Disconnected,
}

impl From<std::io::Error> for BoardError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[derive(Debug)]
pub enum MeasurementError {
    /// The frame's total weight is zero, the center of pressure is undefined.
    DivisionByZero,
}

impl From<MeasurementError> for BoardError {
    fn from(e: MeasurementError) -> Self {
        Self::Measurement(e)
    }
}

pub type BoardResult<T> = Result<T, BoardError>;
