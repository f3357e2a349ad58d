use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::sync::Arc;
use userapi_shared::{
    models::{MessageResponse, User},
    store::UserStore,
};

use super::parse_user_id;
use crate::error::Result;
use crate::models::CreateUserRequest;

// GET /users
pub async fn get_users<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<User>>>
where
    S: UserStore,
{
    let users = store.list_users().await?;
    Ok(Json(users))
}

// GET /users/:id
pub async fn get_user<S>(State(store): State<Arc<S>>, Path(id): Path<String>) -> Result<Json<User>>
where
    S: UserStore,
{
    let id = parse_user_id(&id)?;
    let user = store.get_user(id).await?;
    Ok(Json(user))
}

// POST /users
pub async fn create_user<S>(
    State(store): State<Arc<S>>,
    payload: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<User>>
where
    S: UserStore,
{
    let Json(request) = payload?;
    let new_user = request.validate()?;

    let created = store.create_user(new_user).await?;
    Ok(Json(created))
}

// DELETE /users/:id
pub async fn delete_user<S>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>>
where
    S: UserStore,
{
    let id = parse_user_id(&id)?;
    let deleted = store.delete_user(id).await?;
    Ok(Json(MessageResponse::user_deleted(deleted)))
}
