pub mod admin;
pub mod game;
pub mod health;
pub mod scoreboard;
pub mod sse;
pub mod validation;
