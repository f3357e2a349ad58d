use serde::Serialize;

pub mod user;

pub use user::CreateUserRequest;

/// Static capability descriptor served at `GET /`
#[derive(Debug, Serialize)]
pub struct ApiDescriptor {
    pub message: &'static str,
    pub endpoints: [&'static str; 3],
}

pub const API_DESCRIPTOR: ApiDescriptor = ApiDescriptor {
    message: "User API",
    endpoints: ["/users", "/users/{id}", "/health"],
};
