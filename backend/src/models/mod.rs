// src/models/mod.rs

pub mod admin;
pub mod question;
pub mod result;
