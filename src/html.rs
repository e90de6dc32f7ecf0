use std::collections::HashMap;

use crate::dom::{Dom, LayoutBox, NodeId};
use crate::{Error, Result};

const LAYOUT_TOP_ATTR: &str = "data-layout-top";
const LAYOUT_HEIGHT_ATTR: &str = "data-layout-height";

/// Builds a document from markup. `<script>` and `<style>` bodies are kept as
/// inert text.
pub(crate) fn parse_html(html: &str) -> Result<Dom> {
    let mut dom = Dom::new();

    let mut stack = vec![dom.root()];
    let bytes = html.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        if starts_with_at(bytes, i, b"<!--") {
            if let Some(end) = find_subslice(bytes, i + 4, b"-->") {
                i = end + 3;
            } else {
                return Err(Error::HtmlParse("unclosed HTML comment".into()));
            }
            continue;
        }

        if starts_with_at(bytes, i, b"<!") {
            // Doctype and other declarations carry nothing the page model keeps.
            let end = find_subslice(bytes, i + 2, b">")
                .ok_or_else(|| Error::HtmlParse("unclosed declaration".into()))?;
            i = end + 1;
            continue;
        }

        if bytes[i] == b'<' {
            if starts_with_at(bytes, i, b"</") {
                let (tag, next) = parse_end_tag(html, i)?;
                i = next;

                if !stack[1..]
                    .iter()
                    .any(|node| dom.tag_name(*node) == Some(tag.as_str()))
                {
                    continue;
                }
                while stack.len() > 1 {
                    let top = *stack
                        .last()
                        .ok_or_else(|| Error::HtmlParse("invalid stack state".into()))?;
                    let matched = dom.tag_name(top) == Some(tag.as_str());
                    stack.pop();
                    if matched {
                        break;
                    }
                }
                continue;
            }

            let (tag, attrs, self_closing, next) = parse_start_tag(html, i)?;
            i = next;

            let parent = *stack
                .last()
                .ok_or_else(|| Error::HtmlParse("missing parent element".into()))?;
            let node = dom.create_element(parent, &tag, attrs);

            if is_raw_text_tag(&tag) {
                let close = find_case_insensitive_end_tag(bytes, i, tag.as_bytes())
                    .ok_or_else(|| Error::HtmlParse(format!("unclosed <{tag}>")))?;
                if let Some(body) = html.get(i..close) {
                    if !body.is_empty() {
                        dom.create_text(node, body.to_string());
                    }
                }
                let (_, after_end) = parse_end_tag(html, close)?;
                i = after_end;
                continue;
            }

            if !self_closing && !is_void_tag(&tag) {
                stack.push(node);
            }
            continue;
        }

        let text_start = i;
        while i < bytes.len() && bytes[i] != b'<' {
            i += 1;
        }

        if let Some(text) = html.get(text_start..i) {
            if !text.is_empty() {
                let parent = *stack
                    .last()
                    .ok_or_else(|| Error::HtmlParse("missing parent element".into()))?;
                dom.create_text(parent, text.to_string());
            }
        }
    }

    apply_declared_layout(&mut dom)?;
    Ok(dom)
}

fn apply_declared_layout(dom: &mut Dom) -> Result<()> {
    let declared = dom
        .nodes
        .iter()
        .enumerate()
        .filter_map(|(idx, _)| {
            let node = NodeId(idx);
            let top = dom.attr(node, LAYOUT_TOP_ATTR);
            let height = dom.attr(node, LAYOUT_HEIGHT_ATTR);
            (top.is_some() || height.is_some()).then_some((node, top, height))
        })
        .collect::<Vec<_>>();

    for (node, top, height) in declared {
        let layout = LayoutBox {
            top: parse_px(top.as_deref(), LAYOUT_TOP_ATTR)?,
            height: parse_px(height.as_deref(), LAYOUT_HEIGHT_ATTR)?,
        };
        dom.set_layout_box(node, layout)?;
    }
    Ok(())
}

fn parse_px(raw: Option<&str>, attr: &str) -> Result<f64> {
    let Some(raw) = raw else {
        return Ok(0.0);
    };
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    number
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| Error::HtmlParse(format!("invalid {attr} value: {raw}")))
}

fn parse_start_tag(
    html: &str,
    at: usize,
) -> Result<(String, HashMap<String, String>, bool, usize)> {
    let bytes = html.as_bytes();
    let mut i = at;
    if bytes.get(i) != Some(&b'<') {
        return Err(Error::HtmlParse("expected '<'".into()));
    }
    i += 1;

    skip_ws(bytes, &mut i);
    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }

    let tag = html
        .get(tag_start..i)
        .ok_or_else(|| Error::HtmlParse("invalid tag name".into()))?
        .to_ascii_lowercase();

    if tag.is_empty() {
        return Err(Error::HtmlParse("empty tag name".into()));
    }

    let mut attrs = HashMap::new();
    let mut self_closing = false;

    loop {
        skip_ws(bytes, &mut i);
        if i >= bytes.len() {
            return Err(Error::HtmlParse("unclosed start tag".into()));
        }

        if bytes[i] == b'>' {
            i += 1;
            break;
        }

        if bytes[i] == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'>' {
            self_closing = true;
            i += 2;
            break;
        }

        let name_start = i;
        while i < bytes.len() && is_attr_name_char(bytes[i]) {
            i += 1;
        }

        let name = html
            .get(name_start..i)
            .ok_or_else(|| Error::HtmlParse("invalid attribute name".into()))?
            .to_ascii_lowercase();

        if name.is_empty() {
            return Err(Error::HtmlParse("invalid attribute name".into()));
        }

        skip_ws(bytes, &mut i);

        let value = if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            skip_ws(bytes, &mut i);
            parse_attr_value(html, bytes, &mut i)?
        } else {
            String::new()
        };

        attrs.entry(name).or_insert(value);
    }

    Ok((tag, attrs, self_closing, i))
}

fn parse_end_tag(html: &str, at: usize) -> Result<(String, usize)> {
    let bytes = html.as_bytes();
    let mut i = at;

    if !(bytes.get(i) == Some(&b'<') && bytes.get(i + 1) == Some(&b'/')) {
        return Err(Error::HtmlParse("expected end tag".into()));
    }
    i += 2;
    skip_ws(bytes, &mut i);

    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }

    let tag = html
        .get(tag_start..i)
        .ok_or_else(|| Error::HtmlParse("invalid end tag".into()))?
        .to_ascii_lowercase();

    while i < bytes.len() && bytes[i] != b'>' {
        i += 1;
    }
    if i >= bytes.len() {
        return Err(Error::HtmlParse("unclosed end tag".into()));
    }

    Ok((tag, i + 1))
}

fn parse_attr_value(html: &str, bytes: &[u8], i: &mut usize) -> Result<String> {
    if *i >= bytes.len() {
        return Err(Error::HtmlParse("missing attribute value".into()));
    }

    if bytes[*i] == b'\'' || bytes[*i] == b'"' {
        let quote = bytes[*i];
        *i += 1;
        let start = *i;
        while *i < bytes.len() && bytes[*i] != quote {
            *i += 1;
        }
        if *i >= bytes.len() {
            return Err(Error::HtmlParse("unclosed quoted attribute value".into()));
        }
        let value = html
            .get(start..*i)
            .ok_or_else(|| Error::HtmlParse("invalid attribute value".into()))?
            .to_string();
        *i += 1;
        return Ok(value);
    }

    let start = *i;
    while *i < bytes.len()
        && !bytes[*i].is_ascii_whitespace()
        && bytes[*i] != b'>'
        && !(bytes[*i] == b'/' && *i + 1 < bytes.len() && bytes[*i + 1] == b'>')
    {
        *i += 1;
    }

    let value = html
        .get(start..*i)
        .ok_or_else(|| Error::HtmlParse("invalid attribute value".into()))?
        .to_string();
    Ok(value)
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn is_tag_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn is_attr_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn is_raw_text_tag(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn starts_with_at(bytes: &[u8], at: usize, needle: &[u8]) -> bool {
    bytes
        .get(at..at + needle.len())
        .is_some_and(|window| window == needle)
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || from > bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

fn find_case_insensitive_end_tag(bytes: &[u8], from: usize, tag: &[u8]) -> Option<usize> {
    let mut needle = Vec::with_capacity(tag.len() + 2);
    needle.extend_from_slice(b"</");
    needle.extend(tag.iter().map(|b| b.to_ascii_lowercase()));

    if from > bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(&needle))
        .map(|pos| pos + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_tree_with_attributes() -> Result<()> {
        let dom = parse_html(
            r##"<!DOCTYPE html>
            <header class="site-header"><nav id="nav-menu"><a href="#about">About</a></nav></header>
            <img src=logo.png alt="">
            <section id="about">hi</section>"##,
        )?;
        let nav = dom.by_id("nav-menu").expect("nav indexed");
        let links = dom.query_selector_all_from(nav, "a")?;
        assert_eq!(links.len(), 1);
        assert_eq!(dom.attr(links[0], "href").as_deref(), Some("#about"));
        assert_eq!(dom.query_selector("img")?.and_then(|img| dom.attr(img, "src")), Some("logo.png".into()));
        assert_eq!(dom.text_content(dom.by_id("about").expect("about indexed")), "hi");
        Ok(())
    }

    #[test]
    fn script_bodies_are_inert_text() -> Result<()> {
        let dom = parse_html("<script>if (a < b) { go(); }</script><p id='after'>x</p>")?;
        let script = dom.query_selector("script")?.expect("script element");
        assert_eq!(dom.text_content(script), "if (a < b) { go(); }");
        assert!(dom.by_id("after").is_some());
        Ok(())
    }

    #[test]
    fn stray_end_tags_do_not_close_open_elements() -> Result<()> {
        let dom = parse_html("<div id='outer'></span><p id='inner'></p></div>")?;
        let outer = dom.by_id("outer").expect("outer");
        let inner = dom.by_id("inner").expect("inner");
        assert!(dom.is_descendant_of(inner, outer));
        Ok(())
    }

    #[test]
    fn declared_layout_attributes_become_layout_boxes() -> Result<()> {
        let dom = parse_html(
            "<header class='site-header' data-layout-height='72px'></header>\
             <section id='work' data-layout-top='1200' data-layout-height='400'></section>",
        )?;
        let header = dom.query_selector(".site-header")?.expect("header");
        assert_eq!(dom.offset_height(header)?, 72.0);
        let work = dom.by_id("work").expect("work");
        assert_eq!(dom.layout_box(work), Some(LayoutBox { top: 1200.0, height: 400.0 }));
        Ok(())
    }

    #[test]
    fn rejects_unclosed_constructs() {
        assert!(matches!(parse_html("<!-- open"), Err(Error::HtmlParse(_))));
        assert!(matches!(parse_html("<div class='x"), Err(Error::HtmlParse(_))));
        assert!(matches!(parse_html("<script>x"), Err(Error::HtmlParse(_))));
        assert!(matches!(
            parse_html("<div data-layout-top='tall'></div>"),
            Err(Error::HtmlParse(_))
        ));
    }
}
