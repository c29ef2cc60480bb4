use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::auth::TokenIssuer;
use crate::error::ApiError;
use crate::hasher::PasswordHasher;
use crate::models::{AuthResponse, CreateUserRequest, LoginRequest, User, UserResponse};
use crate::store::{NewUser, StoreError, UserStore};

const MIN_PASSWORD_LENGTH: usize = 7;

/// Registration, lookup and login of user accounts.
pub struct UserHandler {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenIssuer,
}

impl UserHandler {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: TokenIssuer,
    ) -> Self {
        UserHandler {
            users,
            hasher,
            tokens,
        }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, ApiError> {
        let username = request.username.trim();
        if username.is_empty() {
            log::warn!("create user rejected: empty username");
            return Err(ApiError::validation("username is required"));
        }
        if request.password.chars().count() < MIN_PASSWORD_LENGTH {
            log::warn!("create user {username} rejected: password too short");
            return Err(ApiError::validation(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        if request.password != request.confirm_password {
            log::warn!("create user {username} rejected: passwords do not match");
            return Err(ApiError::validation("passwords do not match"));
        }
        if self.users.find_by_username(username).await?.is_some() {
            log::warn!("create user {username} rejected: username taken");
            return Err(ApiError::validation("username is already taken"));
        }

        let password_hash = self.hasher.encode(&request.password)?;
        let user = self
            .users
            .create(NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate => ApiError::validation("username is already taken"),
                other => other.into(),
            })?;

        log::info!("created user {} with id {}", user.username, user.id);
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<User, ApiError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("user {id}")))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<User, ApiError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("user {username}")))
    }

    /// Returns a bearer token when the credentials match a stored user.
    pub async fn login(&self, request: LoginRequest) -> Result<String, ApiError> {
        let user = self.users.find_by_username(&request.username).await?;

        match user {
            Some(user) if self.hasher.verify(&user.password, &request.password) => {
                Ok(self.tokens.issue(&user.username)?)
            }
            _ => {
                log::warn!("failed login for {}", request.username);
                Err(ApiError::Unauthorized)
            }
        }
    }
}

pub async fn create_user(
    handler: web::Data<UserHandler>,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = handler.create_user(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

pub async fn find_by_id(
    handler: web::Data<UserHandler>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let user = handler.find_by_id(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

pub async fn find_by_username(
    handler: web::Data<UserHandler>,
    username: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = handler.find_by_username(&username.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

pub async fn login(
    handler: web::Data<UserHandler>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let token = handler.login(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}
