//! Blog: the statically-defined post list and its JSON API.

pub mod model;
pub mod routes;

pub use model::{Author, BlogPost, BlogStore, format_date};
pub use routes::{BlogState, blog_routes};
