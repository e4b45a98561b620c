pub mod requests;
pub mod responses;

pub use requests::{CalculateRequest, LoginRequest, SearchQuery};
pub use responses::{CalculateResponse, HealthResponse, LoginResponse};
