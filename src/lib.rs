//! HOTFIX site service: contact form delivery and blog content API.

pub mod blog;
pub mod config;
pub mod contact;
pub mod error;
pub mod mail;
pub mod server;
