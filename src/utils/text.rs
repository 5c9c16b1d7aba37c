//! 文本处理工具

/// 文件名最大长度（字符数）
const MAX_NAME_LEN: usize = 60;

/// 空标题的兜底文件名
const FALLBACK_NAME: &str = "Untitled";

/// 从会话标题生成文件系统安全的名称
///
/// 规则：
/// 1. 去掉控制字符和保留字符（`/ \ : * ? " < > |`）
/// 2. 连续空白折叠为单个 `_`
/// 3. 连续 `_` 折叠为一个，去掉首尾 `_`
/// 4. 截断到 60 个字符
/// 5. 结果为空时使用 `Untitled`
///
/// 纯函数：同样的标题永远得到同样的名称，且满足幂等性
pub fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut last_was_sep = true; // 开头的分隔符直接丢弃

    for c in title.chars() {
        let mapped = if c.is_control() {
            None
        } else if c.is_whitespace() {
            Some('_')
        } else {
            match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => None,
                '_' => Some('_'),
                other => Some(other),
            }
        };

        match mapped {
            Some('_') => {
                if !last_was_sep {
                    out.push('_');
                    last_was_sep = true;
                }
            }
            Some(other) => {
                out.push(other);
                last_was_sep = false;
            }
            None => {}
        }
    }

    while out.ends_with('_') {
        out.pop();
    }

    let truncated: String = out.chars().take(MAX_NAME_LEN).collect();
    let trimmed = truncated.trim_end_matches('_').to_string();

    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed
    }
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_basic() {
        assert_eq!(sanitize_title("如何学习 Rust?"), "如何学习_Rust");
        assert_eq!(sanitize_title("a/b\\c:d*e"), "abcde");
    }

    #[test]
    fn test_sanitize_collapses_whitespace_and_separators() {
        assert_eq!(sanitize_title("  a   b\t\nc  "), "a_b_c");
        assert_eq!(sanitize_title("a __ _ b"), "a_b");
    }

    #[test]
    fn test_sanitize_idempotent() {
        let titles = [
            "普通标题",
            "  带空格  的标题  ",
            "a/b:c*d?e\"f<g>h|i",
            "___",
            "",
        ];
        for title in titles {
            let once = sanitize_title(title);
            assert_eq!(sanitize_title(&once), once, "幂等性失败: {:?}", title);
        }
    }

    #[test]
    fn test_sanitize_all_illegal_falls_back() {
        assert_eq!(sanitize_title("///***???"), "Untitled");
        assert_eq!(sanitize_title(""), "Untitled");
        assert_eq!(sanitize_title("   "), "Untitled");
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "字".repeat(200);
        let result = sanitize_title(&long);
        assert_eq!(result.chars().count(), 60);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 5), "hello...");
    }
}
