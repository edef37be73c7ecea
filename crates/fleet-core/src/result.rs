use crate::error::FleetError;

pub type FleetResult<T> = Result<T, FleetError>;
