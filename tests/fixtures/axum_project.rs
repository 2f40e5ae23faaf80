// Axum test fixture - controllers taking validated request bodies
use axum::{
    extract::{Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StoreUserRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1))]
    pub display_name: Option<String>,
    #[serde(skip)]
    pub audit_tag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

pub struct UserController;

impl UserController {
    pub async fn index(&self, Query(query): Query<ListQuery>) -> Json<Vec<User>> {
        Json(vec![])
    }

    pub async fn show(&self, Path(id): Path<u32>) -> Json<User> {
        Json(User {
            id,
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
        })
    }

    pub async fn store(&self, Json(payload): Json<StoreUserRequest>) -> Json<User> {
        Json(User {
            id: 1,
            name: payload.name,
            email: payload.email,
        })
    }

    pub async fn update(
        &self,
        Path(id): Path<u32>,
        Json(payload): Json<UpdateUserRequest>,
    ) -> Json<User> {
        Json(User {
            id,
            name: payload.display_name.unwrap_or_default(),
            email: String::new(),
        })
    }

    pub async fn destroy(&self, Path(id): Path<u32>) {}
}
