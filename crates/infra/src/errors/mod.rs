//! Error conversions between infrastructure libraries and the domain.

mod conversions;

pub use conversions::{
    directory_error_from_app, directory_error_from_status, directory_error_kind, InfraError,
};
