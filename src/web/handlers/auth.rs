//! Authentication handlers.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;

use crate::auth::{Signup, UserService};
use crate::db::User;
use crate::rpc::VoteClient;
use crate::web::dto::{
    ApiResponse, MessageResponse, SigninRequest, SigninResponse, SignupRequest, UserResponse,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, JwtClaims, ACCESS_TOKEN_COOKIE};
use crate::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle (cheap to clone, shares the pool).
    pub db: Database,
    /// Client for the voting service.
    pub vote_client: Arc<VoteClient>,
    /// JWT encoding key.
    pub encoding_key: EncodingKey,
    /// Access token lifetime in seconds.
    pub access_token_expiry: u64,
    /// Mark the access token cookie `Secure`.
    pub secure_cookies: bool,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        db: Database,
        vote_client: VoteClient,
        jwt_secret: &str,
        access_expiry: u64,
        secure_cookies: bool,
    ) -> Self {
        Self {
            db,
            vote_client: Arc::new(vote_client),
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            access_token_expiry: access_expiry,
            secure_cookies,
        }
    }

    /// Generate an access token for a user.
    pub fn generate_access_token(&self, user: &User) -> Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = JwtClaims {
            user_id: user.id.clone(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            iat: now,
            exp: now + self.access_token_expiry,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            ApiError::internal("Failed to generate token")
        })
    }

    fn access_cookie(&self, token: String) -> Cookie<'static> {
        self.session_cookie(
            token,
            time::Duration::seconds(self.access_token_expiry as i64),
        )
    }

    /// Expired, empty access token cookie with the same scope as the live one.
    fn cleared_cookie(&self) -> Cookie<'static> {
        self.session_cookie(String::new(), time::Duration::ZERO)
    }

    fn session_cookie(&self, value: String, max_age: time::Duration) -> Cookie<'static> {
        Cookie::build((ACCESS_TOKEN_COOKIE, value))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .path("/")
            .max_age(max_age)
            .build()
    }
}

/// POST /users/auth/signup - Register a new account.
#[utoipa::path(
    post,
    path = "/users/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    if req.role.is_some() {
        tracing::debug!(email = %req.email, "Ignoring requested role on signup");
    }

    let signup = Signup {
        email: req.email,
        password: req.password,
        name: req.name,
    };
    let user = UserService::new(&state.db).signup(&signup).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(UserResponse::from(user))),
    ))
}

/// POST /users/auth/signin - Sign in and receive the access token cookie.
#[utoipa::path(
    post,
    path = "/users/auth/signin",
    tag = "auth",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in", body = SigninResponse),
        (status = 403, description = "Invalid credentials")
    )
)]
pub async fn signin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<SigninRequest>,
) -> Result<(CookieJar, Json<ApiResponse<SigninResponse>>), ApiError> {
    let user = UserService::new(&state.db)
        .authenticate(&req.email, &req.password)
        .await?;

    let access_token = state.generate_access_token(&user)?;
    let jar = jar.add(state.access_cookie(access_token.clone()));

    tracing::info!(user_id = %user.id, "User signed in");

    Ok((
        jar,
        Json(ApiResponse::new(SigninResponse {
            message: "Signed in successfully".to_string(),
            access_token,
        })),
    ))
}

/// POST /users/auth/logout - Clear the access token cookie.
#[utoipa::path(
    post,
    path = "/users/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Signed out", body = MessageResponse)
    )
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<MessageResponse>>) {
    // Always emit the expired cookie, even when the request carried none.
    let jar = jar.add(state.cleared_cookie());
    (
        jar,
        Json(ApiResponse::new(MessageResponse::new(
            "Signed out successfully",
        ))),
    )
}

/// GET /users/auth/me - Current user.
#[utoipa::path(
    get,
    path = "/users/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account no longer exists")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    )
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = UserService::new(&state.db).find_one(&claims.user_id).await?;
    Ok(Json(ApiResponse::new(UserResponse::from(user))))
}
