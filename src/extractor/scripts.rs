//! 页面内提取脚本
//!
//! 脚本在目标页面中执行，返回 JSON；选择器由平台表提供

use crate::extractor::platform::PlatformSelectors;

/// 生成消息提取脚本
///
/// 按文档顺序收集用户/助手消息节点，返回 `[{speaker, text}, ...]`；
/// `use_html` 为 true 时保留节点的 innerHTML，否则取纯文本
pub fn extraction_js(selectors: &PlatformSelectors, use_html: bool) -> String {
    format!(
        r#"
        () => {{
            const userSel = {user};
            const assistantSel = {assistant};
            const nodes = Array.from(document.querySelectorAll(userSel + ', ' + assistantSel));
            return nodes
                .map(el => ({{
                    speaker: el.matches(userSel) ? 'User' : {assistant_label},
                    text: {use_html} ? el.innerHTML : el.innerText
                }}))
                .filter(m => m.text && m.text.trim().length > 0);
        }}
        "#,
        user = js_string(selectors.user),
        assistant = js_string(selectors.assistant),
        assistant_label = js_string(selectors.assistant_label),
        use_html = use_html,
    )
}

/// 生成消息计数脚本（用于滚动稳定判定）
///
/// 每次调用先滚动到底部触发惰性加载，再返回当前消息节点数量
pub fn message_count_js(selectors: &PlatformSelectors) -> String {
    format!(
        r#"
        () => {{
            window.scrollTo(0, document.body.scrollHeight);
            return document.querySelectorAll({user} + ', ' + {assistant}).length;
        }}
        "#,
        user = js_string(selectors.user),
        assistant = js_string(selectors.assistant),
    )
}

/// 把 Rust 字符串安全地嵌入为 JS 字符串字面量
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::platform::Platform;

    #[test]
    fn test_extraction_js_embeds_selectors() {
        let js = extraction_js(&Platform::ChatGpt.selectors(), false);
        assert!(js.contains(r#"author-role=\"user\""#));
        assert!(js.contains("innerText"));

        let js_html = extraction_js(&Platform::ChatGpt.selectors(), true);
        assert!(js_html.contains("innerHTML"));
    }
}
