pub mod category;
pub mod comment;
pub mod from_row;
pub mod training_session;
pub mod user;
pub mod workout_record;
pub mod workout_type;

pub use category::{Category, Dimension};
pub use comment::{CommenterType, CreateComment, RecordComment};
pub use from_row::{query_all, FromSqliteRow};
pub use training_session::TrainingSession;
pub use user::{User, UserRole};
pub use workout_record::{
    normalize_sets, parse_date, CreateWorkoutRecord, RecordQuery, RecordSummary, SetInput,
    UpdateWorkoutRecord, WorkoutRecord, WorkoutRecordWithType, WorkoutSet,
    DEFAULT_DURATION_MINUTES,
};
pub use workout_type::{CreateWorkoutType, LoggingMode, WorkoutType, WorkoutTypeEntry};
