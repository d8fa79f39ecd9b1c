//! 作业提交门户后端服务
//!
//! 基于 Actix Web 构建的师生作业收发系统，附带大模型自动评分客户端。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `grader`: 大模型自动评分客户端
//! - `middlewares`: 会话与角色中间件
//! - `models`: 数据模型定义
//! - `routes`: 页面路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `session`: 服务端会话存储（Moka）
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 上传与 docx 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod grader;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod session;
pub mod storage;
pub mod utils;
