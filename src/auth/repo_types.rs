use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    /// Stored trimmed and lowercased.
    pub email: String,
    /// Argon2 PHC string. Never leaves the server; responses use `PublicUser`.
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}
