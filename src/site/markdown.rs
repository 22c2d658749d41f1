//! Markdown to HTML conversion for blog posts

use pulldown_cmark::{html::push_html, Event, Options, Parser, Tag};

/// Render Markdown to HTML.
///
/// Tables, footnotes, strikethrough and task lists are enabled. Raw HTML in
/// the source passes through unchanged. Links that leave the site open in a
/// new tab.
pub fn render_markdown(content: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(content, options);

    let mut html = String::with_capacity(content.len() * 3 / 2);
    let mut external_link_depth = 0usize;

    let events = parser.map(|event| match event {
        Event::Start(Tag::Link {
            ref dest_url,
            ref title,
            ..
        }) if is_external(dest_url) => {
            external_link_depth += 1;
            let title_attr = if title.is_empty() {
                String::new()
            } else {
                format!(" title=\"{}\"", escape_attr(title))
            };
            Event::Html(
                format!(
                    "<a href=\"{}\"{} target=\"_blank\" rel=\"noopener\">",
                    escape_attr(dest_url),
                    title_attr
                )
                .into(),
            )
        }
        Event::End(pulldown_cmark::TagEnd::Link) if external_link_depth > 0 => {
            external_link_depth -= 1;
            Event::Html("</a>".into())
        }
        other => other,
    });

    push_html(&mut html, events);
    html
}

fn is_external(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown() {
        let html = render_markdown("# Title\n\nSome *emphasis*.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn renders_tables() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn external_links_open_in_new_tab() {
        let html = render_markdown("[shop](https://shop.test/?a=1&b=2) and [about](/about.html)");
        assert!(html.contains(
            "<a href=\"https://shop.test/?a=1&amp;b=2\" target=\"_blank\" rel=\"noopener\">shop</a>"
        ));
        assert!(html.contains("<a href=\"/about.html\">about</a>"));
    }
}
