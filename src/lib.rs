//! 多租户 CRM 服务库
//! JWT 认证、租户范围解析与租户隔离的业务资源

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
