use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("unknown flow: {0}")]
    UnknownFlow(String),

    #[error("{field} must be positive")]
    NonPositive { field: &'static str },

    #[error("as-of date {as_of} is before the start date {start}")]
    DateBeforeStart {
        start: jiff::civil::Date,
        as_of: jiff::civil::Date,
    },

    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("cannot convert {from} to {to}")]
    IncompatibleUnits { from: String, to: String },

    #[error("date arithmetic failed: {0}")]
    Date(#[from] jiff::Error),
}
