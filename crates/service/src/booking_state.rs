use crate::errors::ServiceError;

/// Query-filter states for booking listings. Distinct from the stored
/// `BookingStatus`: CURRENT/PAST/FUTURE are pure time predicates, WAITING
/// and REJECTED mix time and status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl BookingState {
    pub fn parse(state: &str) -> Result<Self, ServiceError> {
        match state {
            "ALL" => Ok(Self::All),
            "CURRENT" => Ok(Self::Current),
            "PAST" => Ok(Self::Past),
            "FUTURE" => Ok(Self::Future),
            "WAITING" => Ok(Self::Waiting),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(ServiceError::Validation(format!("Unknown state: {other}"))),
        }
    }
}
