#![allow(dead_code)]

use axum::{body::Body, response::Response, Router};
use http::{header, Method, Request};
use http_body_util::BodyExt;
use serde_json::Value;

use gymtrack::db::{create_memory_pool, DbPool};
use gymtrack::migrations::run_migrations_for_tests;
use gymtrack::models::{Category, CreateWorkoutType, Dimension, LoggingMode, User, UserRole, WorkoutType};
use gymtrack::repositories::{
    CategoryRepository, SessionRepository, UserRepository, WorkoutTypeRepository,
};
use gymtrack::routes::{create_router, AppStates};
use gymtrack::session::create_session_cookie;

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn create_test_app(pool: DbPool) -> Router {
    create_router(AppStates::new(pool))
}

pub async fn create_test_user(
    pool: &DbPool,
    username: &str,
    role: UserRole,
    trainer_id: Option<&str>,
) -> User {
    let user_repo = UserRepository::new(pool.clone());
    user_repo.create(username, role, trainer_id).await.unwrap()
}

/// `Cookie` header value for a fresh session of `user`.
pub async fn session_cookie(pool: &DbPool, user: &User) -> String {
    let session_repo = SessionRepository::new(pool.clone());
    let token = session_repo.create(&user.id).await.unwrap();
    let cookie = create_session_cookie(&token);
    format!("{}={}", cookie.name(), cookie.value())
}

pub async fn create_test_category(pool: &DbPool, dimension: u8, name: &str) -> Category {
    let category_repo = CategoryRepository::new(pool.clone());
    category_repo
        .create(Dimension::new(dimension).unwrap(), name)
        .await
        .unwrap()
}

pub async fn create_test_workout_type(
    pool: &DbPool,
    name: &str,
    logging_mode: LoggingMode,
    categories: [Option<&str>; 4],
) -> WorkoutType {
    let workout_type_repo = WorkoutTypeRepository::new(pool.clone());
    workout_type_repo
        .create(CreateWorkoutType {
            name: name.to_string(),
            logging_mode,
            categories: categories.map(|c| c.map(str::to_string)),
        })
        .await
        .unwrap()
}

pub fn request(method: Method, uri: &str, cookie: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie);
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn read_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub async fn read_text(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&body).to_string()
}
