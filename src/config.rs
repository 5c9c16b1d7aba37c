/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 批量任务文件（JSON，包含 chats 列表和格式）
    pub chats_file: String,
    /// 导出文件存放目录（helper 进程的根目录）
    pub output_dir: String,
    /// 每个窗口处理的会话数量（窗口间会重置页面上下文）
    pub window_size: usize,
    /// 页面加载完成后的静默等待时间（毫秒）
    pub settle_delay_ms: u64,
    /// 单次导航的超时时间（秒）
    pub nav_timeout_secs: u64,
    /// 单个会话提取步骤的超时时间（秒）
    pub job_timeout_secs: u64,
    /// 分块传输的单块上限（字节）
    pub chunk_size_bytes: usize,
    /// helper 进程命令；为空时退化为浏览器直接下载
    pub writer_command: Option<String>,
    /// 窗口间重置页面时导航到的中性地址
    pub neutral_url: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 2001,
            chats_file: "chats.json".to_string(),
            output_dir: "exports".to_string(),
            window_size: 4,
            settle_delay_ms: 3000,
            nav_timeout_secs: 30,
            job_timeout_secs: 60,
            chunk_size_bytes: 512 * 1024,
            writer_command: None,
            neutral_url: "about:blank".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.browser_debug_port),
            chats_file: std::env::var("CHATS_FILE").unwrap_or(default.chats_file),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            window_size: std::env::var("WINDOW_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.window_size),
            settle_delay_ms: std::env::var("SETTLE_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.settle_delay_ms),
            nav_timeout_secs: std::env::var("NAV_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.nav_timeout_secs),
            job_timeout_secs: std::env::var("JOB_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.job_timeout_secs),
            chunk_size_bytes: std::env::var("CHUNK_SIZE_BYTES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.chunk_size_bytes),
            writer_command: std::env::var("WRITER_COMMAND").ok().filter(|v| !v.is_empty()),
            neutral_url: std::env::var("NEUTRAL_URL").unwrap_or(default.neutral_url),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}
