use serde::{Deserialize, Serialize};
use userapi_shared::{
    error::ServiceError,
    models::{UserCreate, MAX_FIELD_LEN},
};

/// Body of `POST /users`. Fields are optional here so a missing field gets a
/// clear validation message instead of a serde error.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<UserCreate, ServiceError> {
        let name = required("name", self.name)?;
        let email = required("email", self.email)?;
        Ok(UserCreate { name, email })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, ServiceError> {
    let value =
        value.ok_or_else(|| ServiceError::Validation(format!("Field '{}' is required", field)))?;

    if value.chars().count() > MAX_FIELD_LEN {
        return Err(ServiceError::Validation(format!(
            "Field '{}' must be at most {} characters",
            field, MAX_FIELD_LEN
        )));
    }

    Ok(value)
}
