// src/lib.rs

pub mod action;
pub mod api;
pub mod app_state;
pub mod config;
pub mod service;
pub mod storage;
