pub mod admin;
pub mod auth;
pub mod books;
pub mod calendar;
pub mod diary;
pub mod health;
pub mod moms_week;
pub mod support;
