pub mod health_handler;
pub mod lyrics;
pub mod oauth;

pub use health_handler::health_handler;

use crate::error::BrokerError;
use axum::{
    http::{HeaderValue, StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

/// `302 Found` to `location`. axum's `Redirect` only offers 303/307/308.
pub(crate) fn found(location: &str) -> Result<Response, BrokerError> {
    let location = HeaderValue::from_str(location)?;
    Ok((StatusCode::FOUND, [(LOCATION, location)]).into_response())
}
