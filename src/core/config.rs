/// Store configuration
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | STORE_PATH | orders.redb | 数据库文件路径 |
/// | PAGE_SIZE | 50 | 列表分页大小 |
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database file path
    pub store_path: String,
    /// Page size used when listing orders by cursor
    pub page_size: u64,
}

impl StoreConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            store_path: std::env::var("STORE_PATH").unwrap_or_else(|_| "orders.redb".into()),
            page_size: std::env::var("PAGE_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(crate::orders::DEFAULT_PAGE_SIZE),
        }
    }

    /// Override the store path, keeping everything else. 常用于测试场景
    pub fn with_store_path(mut self, store_path: impl Into<String>) -> Self {
        self.store_path = store_path.into();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
