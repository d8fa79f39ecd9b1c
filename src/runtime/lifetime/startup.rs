use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateAccountRequest;
use crate::session::SessionStore;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub sessions: SessionStore,
}

/// 初始化演示账户
/// 数据库为空时写入一位教师（t1）和两位学生（s1、s2），密码均为 123
async fn seed_accounts(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} account(s), skipping demo seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No accounts found in database, creating demo accounts...");
        }
        Err(e) => {
            warn!("Failed to count accounts: {}, skipping demo seed", e);
            return;
        }
    }

    let seeds = [
        CreateAccountRequest {
            username: "t1".to_string(),
            password: "123".to_string(),
            role: UserRole::Teacher,
            display_name: "张老师".to_string(),
            email: None,
        },
        CreateAccountRequest {
            username: "s1".to_string(),
            password: "123".to_string(),
            role: UserRole::Student,
            display_name: "李同学".to_string(),
            email: None,
        },
        CreateAccountRequest {
            username: "s2".to_string(),
            password: "123".to_string(),
            role: UserRole::Student,
            display_name: "王同学".to_string(),
            email: None,
        },
    ];

    for seed in seeds {
        let username = seed.username.clone();
        match storage.create_user(seed).await {
            Ok(account) => {
                info!(
                    "Demo account created (ID: {}, username: {}, role: {})",
                    account.id, account.username, account.role
                );
            }
            Err(e) => {
                warn!("Failed to create demo account {}: {}", username, e);
            }
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储、演示账户和会话存储
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    // 初始化演示账户（如果需要）
    seed_accounts(&storage).await;

    let sessions = SessionStore::new();
    warn!("Session store initialized");

    StartupContext { storage, sessions }
}
