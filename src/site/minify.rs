//! HTML minification of generated pages

use minify_html::{minify, Cfg};

/// Minify a rendered page, including inline `<style>` and `<script>` blocks
pub fn minify_page(html: &str) -> String {
    let mut cfg = Cfg::default();
    cfg.minify_css = true;
    cfg.minify_js = true;
    // Keep the doctype and html/head tags for older crawlers
    cfg.keep_html_and_head_opening_tags = true;

    let bytes = minify(html.as_bytes(), &cfg);
    String::from_utf8(bytes).unwrap_or_else(|_| html.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace() {
        let page = "<!DOCTYPE html>\n<html>\n  <head>\n    <title>Shop</title>\n  </head>\n  <body>\n    <p>Hello   there</p>\n  </body>\n</html>\n";
        let minified = minify_page(page);
        assert!(minified.len() < page.len());
        assert!(minified.contains("<title>Shop</title>"));
        assert!(minified.contains("Hello there"));
    }

    #[test]
    fn minifies_inline_css() {
        let page = "<style>\n  body {\n    color: red;\n  }\n</style><p>x</p>";
        let minified = minify_page(page);
        assert!(minified.contains("body{color:red}"));
    }
}
