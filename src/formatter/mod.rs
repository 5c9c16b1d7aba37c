//! 格式转换
//!
//! 把消息列表加元数据渲染成单个文本块（markdown / html / plaintext）

use chrono::Local;

use crate::models::{ChatMessage, ExtractedContent, FormatKind};

/// 渲染会话为指定格式的文本
pub fn render(title: &str, messages: &[ChatMessage], format: FormatKind) -> ExtractedContent {
    let exported_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let text = match format {
        FormatKind::Markdown => render_markdown(title, messages, &exported_at),
        FormatKind::Html => render_html(title, messages, &exported_at),
        FormatKind::Plaintext => render_plaintext(title, messages, &exported_at),
    };

    ExtractedContent { text, format }
}

fn render_markdown(title: &str, messages: &[ChatMessage], exported_at: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", title));
    out.push_str(&format!("> 导出时间: {}\n\n", exported_at));

    for message in messages {
        out.push_str(&format!("## {}\n\n{}\n\n", message.speaker, message.text));
    }

    out
}

fn render_html(title: &str, messages: &[ChatMessage], exported_at: &str) -> String {
    let mut body = String::new();
    for message in messages {
        body.push_str(&format!(
            "  <div class=\"message\">\n    <div class=\"speaker\">{}</div>\n    <div class=\"content\">{}</div>\n  </div>\n",
            escape_html(&message.speaker),
            message.text
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<p>导出时间: {exported_at}</p>\n{body}</body>\n</html>\n",
        title = escape_html(title),
        exported_at = exported_at,
        body = body,
    )
}

fn render_plaintext(title: &str, messages: &[ChatMessage], exported_at: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n导出时间: {}\n{}\n\n", title, exported_at, "=".repeat(60)));

    for message in messages {
        out.push_str(&format!("[{}]\n{}\n\n", message.speaker, message.text));
    }

    out
}

/// 转义 HTML 特殊字符（只用于标题和说话人，消息正文本身就是 HTML）
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_messages() -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                speaker: "User".to_string(),
                text: "你好".to_string(),
            },
            ChatMessage {
                speaker: "ChatGPT".to_string(),
                text: "你好！有什么可以帮你的？".to_string(),
            },
        ]
    }

    #[test]
    fn test_render_markdown() {
        let content = render("测试会话", &sample_messages(), FormatKind::Markdown);
        assert!(content.text.starts_with("# 测试会话\n"));
        assert!(content.text.contains("## User\n\n你好"));
        assert!(content.text.contains("## ChatGPT"));
        assert_eq!(content.format, FormatKind::Markdown);
    }

    #[test]
    fn test_render_plaintext() {
        let content = render("测试会话", &sample_messages(), FormatKind::Plaintext);
        assert!(content.text.contains("[User]\n你好"));
    }

    #[test]
    fn test_render_html_escapes_title() {
        let content = render("<b>标题</b>", &sample_messages(), FormatKind::Html);
        assert!(content.text.contains("&lt;b&gt;标题&lt;/b&gt;"));
        assert!(content.text.contains("<!DOCTYPE html>"));
    }
}
