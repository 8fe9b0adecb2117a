//! Cortado Server - 咖啡馆收银边缘节点
//!
//! # 架构概述
//!
//! 本模块是 Cortado Server 的主入口，提供以下核心功能：
//!
//! - **订单生命周期** (`orders`): 桌台 → 订单 → 结账的核心状态机
//! - **存储** (`orders::storage`): 嵌入式 redb 存储，条件写入保证不变量
//! - **服务** (`services`): 菜单目录与历史查询（只读协作方）
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! cortado-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── orders/        # 订单生命周期核心
//! ├── services/      # 目录、历史
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod core;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use orders::{
    OrderError, OrderLineBook, OrderManager, OrderStorage, PaymentFinalizer, TableRegistry,
};
pub use services::{CatalogService, HistoryService};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   ______           __            __
  / ____/___  _____/ /_____ _____/ /___
 / /   / __ \/ ___/ __/ __ `/ __  / __ \
/ /___/ /_/ / /  / /_/ /_/ / /_/ / /_/ /
\____/\____/_/   \__/\__,_/\__,_/\____/
    "#
    );
}
