//! HTTP API handlers for tmb-portal

pub mod achievements;
pub mod auth;
pub mod error;
pub mod export;
pub mod health;
pub mod persons;
pub mod pic;
pub mod products;
pub mod targets;
pub mod views;

pub use achievements::{create_achievement, delete_achievement, list_achievements};
pub use auth::auth_middleware;
pub use error::ApiError;
pub use export::{export_month, leaderboard};
pub use health::health_routes;
pub use persons::{delete_person, list_persons, upsert_persons};
pub use pic::{pic_create_achievement, pic_products};
pub use products::{delete_product, list_products, upsert_product};
pub use targets::{get_allowed, get_targets, put_allowed, put_targets};
pub use views::{individuals, overview, unit_board};
