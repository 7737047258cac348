//! 最小限の HTML リーダー / ライター
//!
//! Handles the markup a page fragment realistically contains: elements,
//! quoted/unquoted/bare attributes, void elements, raw text in `script` and
//! `style`, comments, a doctype and the common character references. It is
//! not a conforming HTML5 tree builder; the only implied end tags are for
//! repeated `p`, `li` and `option` siblings.

use super::{
    Document,
    HtmlError,
    NodeId,
    NodeKind,
};

/// Elements that never have children.
const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is kept verbatim.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Elements closed implicitly by an opening sibling of the same name.
const SELF_NESTING_FORBIDDEN: [&str; 3] = ["p", "li", "option"];

/// Parses a whole page or fragment into a new document.
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    let mut doc = Document::new();
    let root = doc.root();
    build(&mut doc, root, html)?;
    Ok(doc)
}

/// Parses `html` and appends the resulting top-level nodes to `parent`.
///
/// Only the top-level insertions are visible to observers, the same way an
/// `insertAdjacentHTML` call reports them.
pub fn append_fragment(
    doc: &mut Document,
    parent: NodeId,
    html: &str,
) -> Result<Vec<NodeId>, HtmlError> {
    let holder = doc.create_element("template");
    build(doc, holder, html)?;
    let top_level = doc.children(holder).to_vec();
    for node in &top_level {
        doc.append_child(parent, *node)?;
    }
    Ok(top_level)
}

/// `html` を解析して `container` の子として構築
fn build(doc: &mut Document, container: NodeId, html: &str) -> Result<(), HtmlError> {
    let mut stack = vec![container];
    let mut pos = 0;

    while let Some(rest) = html.get(pos..).filter(|rest| !rest.is_empty()) {
        let parent = stack.last().copied().unwrap_or(container);

        if let Some(after) = rest.strip_prefix("<!--") {
            let end = after.find("-->").ok_or(HtmlError::UnclosedComment(pos))?;
            let comment = doc.create_comment(after.get(..end).unwrap_or_default());
            doc.append_child(parent, comment)?;
            pos += 4 + end + 3;
            continue;
        }

        if rest.starts_with("<!") || rest.starts_with("<?") {
            let end = rest.find('>').ok_or(HtmlError::UnclosedTag(pos))?;
            let declaration = rest.get(2..end).unwrap_or_default().trim();
            if declaration.get(..7).is_some_and(|head| head.eq_ignore_ascii_case("doctype")) {
                doc.set_doctype(Some(declaration.to_string()));
            }
            pos += end + 1;
            continue;
        }

        if let Some(after) = rest.strip_prefix("</") {
            let end = after.find('>').ok_or(HtmlError::UnclosedTag(pos))?;
            let tag = after.get(..end).unwrap_or_default().trim().to_ascii_lowercase();
            close_element(doc, &mut stack, &tag);
            pos += 2 + end + 1;
            continue;
        }

        if rest.starts_with('<') && rest.as_bytes().get(1).is_some_and(u8::is_ascii_alphabetic) {
            let (tag, consumed) = parse_start_tag(rest, pos)?;
            pos += consumed;

            if SELF_NESTING_FORBIDDEN.contains(&tag.name.as_str())
                && doc.tag_name(parent) == Some(tag.name.as_str())
            {
                stack.pop();
            }
            let parent = stack.last().copied().unwrap_or(container);

            let element = doc.create_element(&tag.name);
            for (name, value) in &tag.attributes {
                doc.set_attribute(element, name, value)?;
            }
            doc.append_child(parent, element)?;

            if RAW_TEXT_ELEMENTS.contains(&tag.name.as_str()) && !tag.self_closing {
                let body = html.get(pos..).unwrap_or_default();
                let close = find_end_tag(body, &tag.name)
                    .ok_or_else(|| HtmlError::UnclosedRawText { tag: tag.name.clone() })?;
                let content = body.get(..close).unwrap_or_default();
                if !content.is_empty() {
                    let text = doc.create_text(content);
                    doc.append_child(element, text)?;
                }
                let tail = body.get(close..).unwrap_or_default();
                let end = tail.find('>').ok_or(HtmlError::UnclosedTag(pos + close))?;
                pos += close + end + 1;
                continue;
            }

            if !tag.self_closing && !VOID_ELEMENTS.contains(&tag.name.as_str()) {
                stack.push(element);
            }
            continue;
        }

        // Plain text up to the next tag; a lone '<' is kept as text.
        let end = match rest.find('<') {
            Some(0) => rest.get(1..).and_then(|tail| tail.find('<')).map_or(rest.len(), |i| i + 1),
            Some(i) => i,
            None => rest.len(),
        };
        let raw = rest.get(..end).unwrap_or_default();
        let text = doc.create_text(&decode_character_references(raw));
        doc.append_child(parent, text)?;
        pos += end;
    }

    Ok(())
}

/// Pops up to and including the innermost open `tag`. Stray end tags are
/// ignored.
fn close_element(doc: &Document, stack: &mut Vec<NodeId>, tag: &str) {
    let Some(depth) = stack.iter().rposition(|id| doc.tag_name(*id) == Some(tag)) else {
        tracing::debug!(tag, "Ignoring end tag without matching start tag");
        return;
    };
    // The container itself is never popped.
    stack.truncate(depth.max(1));
}

/// 解析済みの開始タグ
#[derive(Debug)]
struct StartTag {
    /// 小文字のタグ名
    name: String,
    /// デコード済みの属性
    attributes: Vec<(String, String)>,
    /// `/>` で閉じているか
    self_closing: bool,
}

/// Parses `<name attr=value ...>` at the start of `src`. Returns the tag and
/// the number of bytes consumed.
fn parse_start_tag(src: &str, offset: usize) -> Result<(StartTag, usize), HtmlError> {
    let bytes = src.as_bytes();
    let mut i = 1;

    let name_start = i;
    while bytes.get(i).is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'-' || *b == b':') {
        i += 1;
    }
    let name = src.get(name_start..i).unwrap_or_default().to_ascii_lowercase();
    if name.is_empty() {
        return Err(HtmlError::EmptyTagName(offset));
    }

    let mut attributes = Vec::new();
    let mut self_closing = false;

    loop {
        while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
            i += 1;
        }
        match bytes.get(i) {
            None => return Err(HtmlError::UnclosedTag(offset)),
            Some(b'>') => {
                i += 1;
                break;
            }
            Some(b'/') if bytes.get(i + 1) == Some(&b'>') => {
                self_closing = true;
                i += 2;
                break;
            }
            Some(b'/') => {
                i += 1;
                continue;
            }
            Some(_) => {}
        }

        let attr_start = i;
        while bytes
            .get(i)
            .is_some_and(|b| !b.is_ascii_whitespace() && !matches!(*b, b'=' | b'>' | b'/'))
        {
            i += 1;
        }
        let attr_name = src.get(attr_start..i).unwrap_or_default().to_ascii_lowercase();

        while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
            i += 1;
        }
        let value = if bytes.get(i) == Some(&b'=') {
            i += 1;
            while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
                i += 1;
            }
            match bytes.get(i) {
                Some(quote @ (b'"' | b'\'')) => {
                    let value_start = i + 1;
                    let len = src
                        .get(value_start..)
                        .and_then(|tail| tail.find(char::from(*quote)))
                        .ok_or(HtmlError::UnclosedAttributeValue(offset + i))?;
                    i = value_start + len + 1;
                    decode_character_references(
                        src.get(value_start..value_start + len).unwrap_or_default(),
                    )
                }
                _ => {
                    let value_start = i;
                    while bytes.get(i).is_some_and(|b| !b.is_ascii_whitespace() && *b != b'>') {
                        i += 1;
                    }
                    decode_character_references(src.get(value_start..i).unwrap_or_default())
                }
            }
        } else {
            String::new()
        };

        if !attr_name.is_empty() && !attributes.iter().any(|(name, _)| *name == attr_name) {
            attributes.push((attr_name, value));
        }
    }

    Ok((StartTag { name, attributes, self_closing }, i))
}

/// Byte offset of `</tag` (ASCII case-insensitive) in `src`.
fn find_end_tag(src: &str, tag: &str) -> Option<usize> {
    let needle = format!("</{tag}");
    let lowered = src.to_ascii_lowercase();
    lowered.find(&needle)
}

/// Decodes the named references HTML authors actually use plus numeric
/// references. Anything unrecognised is left as written.
#[must_use]
pub fn decode_character_references(src: &str) -> String {
    if !src.contains('&') {
        return src.to_string();
    }

    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(amp) = rest.find('&') {
        out.push_str(rest.get(..amp).unwrap_or_default());
        let tail = rest.get(amp..).unwrap_or_default();
        let decoded = tail.find(';').filter(|semi| *semi <= 10).and_then(|semi| {
            let name = tail.get(1..semi)?;
            decode_reference(name).map(|c| (c, semi + 1))
        });
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = tail.get(consumed..).unwrap_or_default();
            }
            None => {
                out.push('&');
                rest = tail.get(1..).unwrap_or_default();
            }
        }
    }
    out.push_str(rest);
    out
}

/// `&name;` の `name` 部分を文字に変換
fn decode_reference(name: &str) -> Option<char> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse().ok()?,
        };
        return char::from_u32(code);
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        "copy" => Some('©'),
        "hellip" => Some('…'),
        "mdash" => Some('—'),
        "ndash" => Some('–'),
        _ => None,
    }
}

/// Serializes the whole document, doctype included.
#[must_use]
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    if let Some(doctype) = doc.doctype() {
        out.push_str("<!");
        out.push_str(doctype);
        out.push('>');
    }
    for child in doc.children(doc.root()) {
        write_node(doc, *child, &mut out);
    }
    out
}

/// Serializes `node` itself and everything below it.
#[must_use]
pub fn outer_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, node, &mut out);
    out
}

/// Serializes the children of `node`.
#[must_use]
pub fn inner_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    for child in doc.children(node) {
        write_node(doc, *child, &mut out);
    }
    out
}

/// ノードを HTML として書き出す
fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    match doc.kind(node) {
        None => {}
        Some(NodeKind::Document) => {
            for child in doc.children(node) {
                write_node(doc, *child, out);
            }
        }
        Some(NodeKind::Text(text)) => {
            let raw = doc
                .parent(node)
                .and_then(|parent| doc.tag_name(parent))
                .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
            if raw {
                out.push_str(text);
            } else {
                escape_into(text, false, out);
            }
        }
        Some(NodeKind::Comment(text)) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        Some(NodeKind::Element(element)) => {
            out.push('<');
            out.push_str(&element.tag_name);
            for (name, value) in &element.attributes {
                out.push(' ');
                out.push_str(name);
                if !value.is_empty() {
                    out.push_str("=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&element.tag_name.as_str()) {
                return;
            }
            for child in doc.children(node) {
                write_node(doc, *child, out);
            }
            out.push_str("</");
            out.push_str(&element.tag_name);
            out.push('>');
        }
    }
}

/// テキストまたは属性値としてエスケープ
fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
