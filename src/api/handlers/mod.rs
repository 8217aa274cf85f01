pub mod auth;
pub mod data;
pub mod health;
pub mod navigation;
pub mod pages;
