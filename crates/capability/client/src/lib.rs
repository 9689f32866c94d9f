//! # 远端数据服务 API 客户端
//!
//! - [`traits`]：按资源拆分的异步接口（角色、用户、类型、流）
//! - [`http`]：基于 reqwest 的实现，bearer token 来自 `adh-auth`
//! - [`in_memory`]：内存实现，用于测试和离线演示
//! - [`error`]：统一的客户端错误类型
//!
//! 每次调用只发送一次请求，不做重试。

pub mod error;
pub mod http;
pub mod in_memory;
pub mod traits;

pub use error::*;
pub use http::HttpHistorianClient;
pub use in_memory::InMemoryHistorian;
pub use traits::*;
