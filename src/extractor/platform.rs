//! 聊天平台识别
//!
//! 每个平台的 DOM 结构不同，按 URL 识别平台后选用对应的选择器

/// 支持的聊天平台
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    ChatGpt,
    Claude,
    Gemini,
    DeepSeek,
}

/// 平台对应的消息节点选择器
#[derive(Debug, Clone, Copy)]
pub struct PlatformSelectors {
    /// 用户消息节点
    pub user: &'static str,
    /// 助手消息节点
    pub assistant: &'static str,
    /// 助手的显示名
    pub assistant_label: &'static str,
}

impl Platform {
    /// 根据页面 URL 识别平台
    pub fn from_url(url: &str) -> Option<Self> {
        if url.contains("chatgpt.com") || url.contains("chat.openai.com") {
            Some(Platform::ChatGpt)
        } else if url.contains("claude.ai") {
            Some(Platform::Claude)
        } else if url.contains("gemini.google.com") {
            Some(Platform::Gemini)
        } else if url.contains("chat.deepseek.com") {
            Some(Platform::DeepSeek)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::ChatGpt => "ChatGPT",
            Platform::Claude => "Claude",
            Platform::Gemini => "Gemini",
            Platform::DeepSeek => "DeepSeek",
        }
    }

    /// 该平台的消息选择器
    pub fn selectors(&self) -> PlatformSelectors {
        match self {
            Platform::ChatGpt => PlatformSelectors {
                user: r#"[data-message-author-role="user"]"#,
                assistant: r#"[data-message-author-role="assistant"]"#,
                assistant_label: "ChatGPT",
            },
            Platform::Claude => PlatformSelectors {
                user: r#"[data-testid="user-message"]"#,
                assistant: ".font-claude-message",
                assistant_label: "Claude",
            },
            Platform::Gemini => PlatformSelectors {
                user: "user-query",
                assistant: "model-response",
                assistant_label: "Gemini",
            },
            Platform::DeepSeek => PlatformSelectors {
                user: ".fa81",
                assistant: ".f9bf7997",
                assistant_label: "DeepSeek",
            },
        }
    }
}
