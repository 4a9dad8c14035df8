//! Seed script for development: populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` and `JWT_SECRET` environment variables (reads .env).
//! Prints a session token for the demo user; send it as `Authorization:
//! Bearer <token>` or store it in the `auth_token` cookie.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const DEMO_USERNAME: &str = "demo";

/// Token lifetime for the printed session token.
const TOKEN_EXPIRY_SECS: i64 = 30 * 24 * 3600;

/// (project, language, editor, operating system, machine, minutes per day)
const SAMPLE_ACTIVITY: &[(&str, &str, &str, &str, &str, i64)] = &[
    ("codetally", "Rust", "helix", "Linux", "workstation", 95),
    ("codetally", "SQL", "helix", "Linux", "workstation", 20),
    ("codetally", "HTML", "VSCode", "Linux", "workstation", 25),
    ("dotfiles", "Bash", "Neovim", "Darwin", "laptop", 15),
    ("dotfiles", "TOML", "Neovim", "Darwin", "laptop", 5),
    ("scratch", "Python", "VSCode", "Windows", "gaming-pc", 30),
];

const SEED_DAYS: i64 = 45;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let pool = codetally::db::create_pool(&db_url, 5).await?;

    // Run migrations first
    codetally::db::run_migrations(&pool).await?;

    println!("=== codetally seed script ===");

    let user_id = seed_demo_user(&pool).await?;
    seed_durations(&pool, user_id).await?;

    let token = codetally::services::auth::issue_token(user_id, &jwt_secret, TOKEN_EXPIRY_SECS)?;

    println!("\n=== Seed complete! ===");
    println!("User: {DEMO_USERNAME} ({user_id})");
    println!("Session token: {token}");

    Ok(())
}

async fn seed_demo_user(pool: &PgPool) -> anyhow::Result<Uuid> {
    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
        .bind(DEMO_USERNAME)
        .fetch_optional(pool)
        .await?;

    if let Some(id) = existing {
        println!("[skip] Demo user already exists");
        return Ok(id);
    }

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (username, api_key) VALUES ($1, $2) RETURNING id",
    )
    .bind(DEMO_USERNAME)
    .bind(Uuid::new_v4().to_string())
    .fetch_one(pool)
    .await?;

    println!("[done] Created demo user");
    Ok(id)
}

async fn seed_durations(pool: &PgPool, user_id: Uuid) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM durations WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] Durations already seeded ({count} rows)");
        return Ok(());
    }

    let now = Utc::now();
    let mut inserted = 0;
    for day in 0..SEED_DAYS {
        // Weekends and every fifth day stay quiet.
        if day % 7 >= 5 || day % 5 == 4 {
            continue;
        }
        let mut at = now - Duration::days(day) - Duration::hours(6);
        for (project, language, editor, os, machine, minutes) in SAMPLE_ACTIVITY {
            sqlx::query(
                r#"
                INSERT INTO durations
                    (user_id, time, duration_seconds, project, language, editor, operating_system, machine)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(user_id)
            .bind(at)
            .bind(minutes * 60)
            .bind(*project)
            .bind(*language)
            .bind(*editor)
            .bind(*os)
            .bind(*machine)
            .execute(pool)
            .await?;
            at += Duration::minutes(*minutes);
            inserted += 1;
        }
    }

    println!("[done] Inserted {inserted} durations over {SEED_DAYS} days");
    Ok(())
}
