//! HTTP 处理器模块

pub mod account;
pub mod activity;
pub mod auth;
pub mod contact;
pub mod deal;
pub mod health;
pub mod lead;
pub mod member;
pub mod organization;
pub mod role;
