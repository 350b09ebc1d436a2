//! Database models split into domain-specific modules.

pub mod about;
pub mod blog;
pub mod common;
pub mod contact_info;
pub mod contact_message;
pub mod gallery;
pub mod image;
pub mod service;
pub mod stats;
pub mod update;
pub mod user;

pub use about::*;
pub use blog::*;
pub use common::*;
pub use contact_info::*;
pub use contact_message::*;
pub use gallery::*;
pub use image::*;
pub use service::*;
pub use stats::*;
pub use update::*;
pub use user::*;
