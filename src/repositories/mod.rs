pub mod category_repo;
pub mod comment_repo;
pub mod favorite_repo;
pub mod session_repo;
pub mod training_session_repo;
pub mod user_repo;
pub mod workout_record_repo;
pub mod workout_type_repo;

pub use category_repo::CategoryRepository;
pub use comment_repo::CommentRepository;
pub use favorite_repo::FavoriteRepository;
pub use session_repo::SessionRepository;
pub use training_session_repo::TrainingSessionRepository;
pub use user_repo::UserRepository;
pub use workout_record_repo::WorkoutRecordRepository;
pub use workout_type_repo::WorkoutTypeRepository;
