//! Client-agnostic tracker logic: picker filtering, day completion, the month
//! grid and the command dispatcher tying them to the stores.

pub mod calendar;
pub mod command;
pub mod completion;
pub mod filter;

pub use calendar::{build_month_grid, CalendarCell, CalendarView, TrailingPolicy, YearMonth};
pub use command::{Command, CommandOutcome, Dispatcher, TrackerContext};
pub use completion::{aggregate_by_date, aggregate_day, CompletionState};
pub use filter::{filter_workout_types, FilterState};
