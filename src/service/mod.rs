//! Embedding surface for a running service: the request gate and the
//! change-password endpoint.

pub mod endpoint;
pub mod gate;

pub use endpoint::{change_password, ChangePasswordRequest, EndpointResponse};
pub use gate::AdminGate;
