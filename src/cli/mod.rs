pub mod recommend;
pub mod setup;
pub mod ui;
