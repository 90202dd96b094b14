use notion_md_client::RichText;
use notion_md_config::RichTextStyle;

/// Turn a sequence of rich-text runs into Markdown text.
pub fn format_rich_text(runs: &[RichText], style: RichTextStyle) -> String {
    match style {
        RichTextStyle::Plain => RichText::join_plain(runs),
        RichTextStyle::Markdown => runs.iter().map(format_run).collect(),
    }
}

/// Inline code excludes every other mark.  Otherwise emphasis is applied
/// innermost, then strikethrough, then underline; a link wraps the result.
fn format_run(run: &RichText) -> String {
    let text = run.plain_text.as_str();
    if text.is_empty() {
        return String::new();
    }
    let a = &run.annotations;

    let mut out = if a.code {
        format!("`{text}`")
    } else {
        let mut s = match (a.bold, a.italic) {
            (true, true) => format!("***{text}***"),
            (true, false) => format!("**{text}**"),
            (false, true) => format!("*{text}*"),
            (false, false) => text.to_string(),
        };
        if a.strikethrough {
            s = format!("~~{s}~~");
        }
        if a.underline {
            s = format!("<u>{s}</u>");
        }
        s
    };

    if let Some(href) = &run.href {
        out = format!("[{out}]({href})");
    }
    out
}
