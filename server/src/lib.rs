//! PhotoHunt Server - 照片寻人游戏后端
//!
//! # 架构概述
//!
//! 本模块是 PhotoHunt 后端的主入口，提供以下核心功能：
//!
//! - **照片管理** (`api::admin_photos`): 上传、更新、删除照片
//! - **标签管理** (`api::admin_tags`): 照片上的命名坐标点
//! - **游戏判定** (`game`): 点击与标签的邻近匹配、计时
//! - **排行榜** (`api::scores`): 按完成时间排序的最快成绩
//! - **会话门禁** (`auth`): 基于 cookie 会话的管理员模式
//!
//! # 模块结构
//!
//! ```text
//! server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # 管理员会话门禁
//! ├── api/           # HTTP 路由和处理器
//! ├── game/          # 邻近匹配与对局状态
//! ├── storage/       # 上传文件存储
//! ├── db/            # 数据库层 (模型 + 仓储)
//! └── utils/         # 错误、响应、校验、日志
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod game;
pub mod storage;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger;

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() {
    dotenv::dotenv().ok();
    init_logger();
}

pub fn print_banner() {
    println!(
        r#"
    ____  __          __        __  __            __
   / __ \/ /_  ____  / /_____  / / / /_  ______  / /_
  / /_/ / __ \/ __ \/ __/ __ \/ /_/ / / / / __ \/ __/
 / ____/ / / / /_/ / /_/ /_/ / __  / /_/ / / / / /_
/_/   /_/ /_/\____/\__/\____/_/ /_/\__,_/_/ /_/\__/
    "#
    );
}
