pub mod auth;
pub mod calendar;
pub mod catalog;
pub mod comments;
pub mod favorites;
pub mod health;
pub mod records;
pub mod tracker;
