use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, Credentials, PublicUser, RefreshRequest, MIN_PASSWORD_LEN},
        password,
        repo::{is_unique_violation, User},
        services::{start_session, AuthUser},
        tokens::TokenKind,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let Json(creds) = payload?;
    let creds = creds.normalized()?;

    if creds.password.chars().count() < MIN_PASSWORD_LEN {
        warn!(email = %creds.email, "password too short");
        return Err(AppError::bad_request("Password too short"));
    }

    let hash =
        password::hash(&creds.password).map_err(AppError::internal("Registration failed"))?;

    // Duplicates, concurrent ones included, surface as a users.email unique violation.
    let user = match User::create(&state.db, &creds.email, &hash).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %creds.email, "email already registered");
            return Err(AppError::Conflict("Email already registered".into()));
        }
        Err(e) => return Err(AppError::internal("Registration failed")(e)),
    };

    info!(user_id = user.id, "user registered");
    Ok((StatusCode::CREATED, Json(start_session(&state.tokens, user)?)))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(creds) = payload?;
    let creds = creds.normalized()?;

    let user = User::find_by_email(&state.db, &creds.email)
        .await
        .map_err(AppError::internal("Login failed"))?;

    let Some(user) = user else {
        warn!(email = %creds.email, "login for unknown email");
        return Err(AppError::unauthorized("Invalid credentials"));
    };

    if !password::verify(&creds.password, &user.password_hash)
        .map_err(AppError::internal("Login failed"))?
    {
        warn!(user_id = user.id, "login with wrong password");
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    info!(user_id = user.id, "user logged in");
    Ok(Json(start_session(&state.tokens, user)?))
}

/// Trades a refresh token for a new access/refresh pair.
#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(req) = payload?;
    let user_id = state
        .tokens
        .verify(&req.refresh_token, TokenKind::Refresh)
        .map_err(|e| {
            warn!(error = %e, "refresh rejected");
            AppError::unauthorized("Invalid refresh token")
        })?;

    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(AppError::internal("Token refresh failed"))?
        .ok_or_else(|| AppError::unauthorized("User not found"))?;

    Ok(Json(start_session(&state.tokens, user)?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(AppError::internal("Failed to load user"))?
        .ok_or_else(|| {
            warn!(user_id, "user not found");
            AppError::unauthorized("User not found")
        })?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::build_app;
    use crate::test_support::{bearer_for, get, post_json, send};
    use serde_json::{json, Value};
    use sqlx::PgPool;

    fn register_req(email: &str, password: &str) -> axum::http::Request<axum::body::Body> {
        post_json(
            "/api/auth/register",
            None,
            json!({ "email": email, "password": password }),
        )
    }

    fn login_req(email: &str, password: &str) -> axum::http::Request<axum::body::Body> {
        post_json(
            "/api/auth/login",
            None,
            json!({ "email": email, "password": password }),
        )
    }

    #[tokio::test]
    async fn register_rejects_invalid_email() {
        let app = build_app(AppState::fake());
        let (status, body) = send(app, register_req("not-an-email", "long enough pw")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid email" }));
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let app = build_app(AppState::fake());
        let (status, body) = send(app, register_req("amy@example.com", "short")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Password too short" }));
    }

    #[tokio::test]
    async fn login_rejects_invalid_email_before_lookup() {
        let app = build_app(AppState::fake());
        let (status, body) = send(app, login_req("amy", "whatever-pw")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid email" }));
    }

    #[tokio::test]
    async fn refresh_rejects_garbage_token() {
        let app = build_app(AppState::fake());
        let req = post_json("/api/auth/refresh", None, json!({ "refresh_token": "nope" }));
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Invalid refresh token" }));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn register_returns_session_and_lowercases_email(pool: PgPool) -> anyhow::Result<()> {
        let app = build_app(AppState::with_pool(pool));

        let (status, body) =
            send(app.clone(), register_req(" Amy@Example.com ", "hunter2hunter2")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["email"], "amy@example.com");
        let token = body["token"].as_str().unwrap();
        assert!(body["refresh_token"].is_string());

        let (status, me) = send(app, get("/api/me", Some(&format!("Bearer {token}")))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["email"], "amy@example.com");
        assert_eq!(me["id"], body["user"]["id"]);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn duplicate_email_is_409(pool: PgPool) -> anyhow::Result<()> {
        let app = build_app(AppState::with_pool(pool));

        let (status, _) = send(app.clone(), register_req("amy@example.com", "hunter2hunter2")).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(app, register_req("AMY@example.com", "another-password")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "error": "Email already registered" }));
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn concurrent_registrations_yield_one_account(pool: PgPool) -> anyhow::Result<()> {
        let app = build_app(AppState::with_pool(pool.clone()));

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let app = app.clone();
                tokio::spawn(async move {
                    send(app, register_req("race@example.com", &format!("password-{i}"))).await
                })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for task in tasks {
            let (status, body) = task.await?;
            match status {
                StatusCode::CREATED => created += 1,
                StatusCode::CONFLICT => {
                    assert_eq!(body, json!({ "error": "Email already registered" }));
                    conflicts += 1;
                }
                other => panic!("unexpected {other}: {body}"),
            }
        }
        assert_eq!((created, conflicts), (1, 7));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind("race@example.com")
            .fetch_one(&pool)
            .await?;
        assert_eq!(count, 1);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn second_insert_is_reported_as_unique_violation(pool: PgPool) -> anyhow::Result<()> {
        User::create(&pool, "dup@example.com", "h").await?;
        let err = User::create(&pool, "dup@example.com", "h").await.unwrap_err();
        assert!(is_unique_violation(&err));
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn login_checks_credentials(pool: PgPool) -> anyhow::Result<()> {
        let app = build_app(AppState::with_pool(pool));
        send(app.clone(), register_req("amy@example.com", "hunter2hunter2")).await;

        for req in [
            login_req("amy@example.com", "wrong-password"),
            login_req("nobody@example.com", "hunter2hunter2"),
        ] {
            let (status, body) = send(app.clone(), req).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, json!({ "error": "Invalid credentials" }));
        }

        let (status, body) = send(app, login_req("Amy@Example.com", "hunter2hunter2")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].is_string());
        assert_eq!(body["user"]["email"], "amy@example.com");
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn refresh_rotates_the_pair(pool: PgPool) -> anyhow::Result<()> {
        let app = build_app(AppState::with_pool(pool));

        let (_, session) = send(app.clone(), register_req("amy@example.com", "hunter2hunter2")).await;
        let refresh_token = session["refresh_token"].clone();

        let (status, rotated) = send(
            app.clone(),
            post_json("/api/auth/refresh", None, json!({ "refresh_token": refresh_token })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rotated["user"], session["user"]);
        let token = rotated["token"].as_str().unwrap();
        let (status, _) = send(app.clone(), get("/api/me", Some(&format!("Bearer {token}")))).await;
        assert_eq!(status, StatusCode::OK);

        // An access token is not accepted in place of a refresh token.
        let (status, body) = send(
            app,
            post_json("/api/auth/refresh", None, json!({ "refresh_token": session["token"] })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Invalid refresh token" }));
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn me_for_deleted_user_is_401(pool: PgPool) -> anyhow::Result<()> {
        let state = AppState::with_pool(pool);
        let (status, body): (StatusCode, Value) =
            send(build_app(state.clone()), get("/api/me", Some(&bearer_for(&state, 4242)))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "User not found" }));
        Ok(())
    }
}
