pub mod book;
pub mod calendar;
pub mod diary;
pub mod moms_week;
pub mod stats;
pub mod support;
pub mod user;
