//! Sanitization of user supplied text
//!
//! Two levels are available: [`escape`] turns all markup into inert text and
//! is meant for plain text fields like names, [`Policy::clean`] keeps an
//! allow-list of benign formatting tags while dropping anything executable
//! and is meant for rich text content.
//!
//! Both are applied at write time, so stored values are already safe.

/// Allow-list describing which markup survives [`Policy::clean`]
///
/// Tags not on the list are escaped in place, attributes not on the list are
/// dropped from tags that are kept.
pub struct Policy {
    /// Tags that are kept as markup
    allowed_tags: &'static [&'static str],

    /// Attributes that are kept on allowed tags
    allowed_attributes: &'static [&'static str],
}

/// The policy for note content
///
/// Inline formatting and images survive, event handlers and script do not.
pub const CONTENT_POLICY: Policy = Policy {
    allowed_tags: &[
        "a",
        "b",
        "blockquote",
        "br",
        "code",
        "em",
        "i",
        "img",
        "li",
        "ol",
        "p",
        "pre",
        "strong",
        "ul",
    ],
    allowed_attributes: &["alt", "href", "src", "title"],
};

/// Escape all markup in a plain text field
///
/// Only the angle brackets are replaced, ampersands are left alone so that
/// escaping an already escaped value changes nothing.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for character in text.chars() {
        match character {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(character),
        }
    }

    escaped
}

/// A single parsed attribute of a tag
struct Attribute<'input> {
    /// Attribute name, as written
    name: &'input str,

    /// Attribute value, without quotes
    value: Option<&'input str>,

    /// The attribute exactly as written, re-emitted when kept
    source: &'input str,
}

/// A single parsed tag
struct Tag<'input> {
    /// Tag name, as written
    name: &'input str,

    /// Is this a closing tag (`</strong>`)
    is_closing: bool,

    /// Is this a self-closing tag (`<br />`)
    is_self_closing: bool,

    /// Attributes, in source order
    attributes: Vec<Attribute<'input>>,

    /// Byte offset just past the closing `>`
    end: usize,
}

impl Policy {
    /// Clean a rich text value according to this policy
    ///
    /// Allowed tags are re-emitted with only their allowed attributes,
    /// disallowed tags are escaped in place (their inner text is kept), and
    /// stray `<` characters are escaped. Cleaning is idempotent.
    pub fn clean(&self, input: &str) -> String {
        let mut output = String::with_capacity(input.len());
        let mut position = 0;

        while let Some(offset) = input[position..].find('<') {
            let start = position + offset;
            output.push_str(&input[position..start]);

            if let Some(tag) = parse_tag(input, start) {
                if self.is_allowed_tag(tag.name) {
                    self.emit_tag(&mut output, &tag);
                } else {
                    output.push_str(&escape(&input[start..tag.end]));
                }

                position = tag.end;
            } else {
                output.push_str("&lt;");
                position = start + 1;
            }
        }

        output.push_str(&input[position..]);

        output
    }

    fn is_allowed_tag(&self, name: &str) -> bool {
        self.allowed_tags
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(name))
    }

    fn is_allowed_attribute(&self, attribute: &Attribute) -> bool {
        let allowed = self
            .allowed_attributes
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(attribute.name));

        if !allowed {
            return false;
        }

        if let Some(value) = attribute.value {
            let value = value.trim().to_ascii_lowercase();

            if value.starts_with("javascript:")
                || value.starts_with("vbscript:")
                || value.starts_with("data:")
            {
                return false;
            }
        }

        true
    }

    /// Re-emit an allowed tag, keeping only its allowed attributes
    fn emit_tag(&self, output: &mut String, tag: &Tag) {
        output.push('<');

        if tag.is_closing {
            output.push('/');
        }

        output.push_str(tag.name);

        if !tag.is_closing {
            for attribute in &tag.attributes {
                if self.is_allowed_attribute(attribute) {
                    output.push(' ');
                    output.push_str(attribute.source);
                }
            }

            if tag.is_self_closing {
                output.push_str(" /");
            }
        }

        output.push('>');
    }
}

/// Try to parse a tag starting at the `<` at `start`
///
/// Returns `None` when the input is not a tag at all, the caller then escapes
/// the lone `<` and moves on.
fn parse_tag(input: &str, start: usize) -> Option<Tag<'_>> {
    let bytes = input.as_bytes();
    let mut position = start + 1;

    let is_closing = bytes.get(position) == Some(&b'/');
    if is_closing {
        position += 1;
    }

    let name_start = position;
    while position < bytes.len() && bytes[position].is_ascii_alphanumeric() {
        position += 1;
    }

    if position == name_start {
        return None;
    }

    let name = &input[name_start..position];
    let mut attributes = Vec::new();
    let mut is_self_closing = false;

    loop {
        while position < bytes.len() && bytes[position].is_ascii_whitespace() {
            position += 1;
        }

        match *bytes.get(position)? {
            b'>' => {
                return Some(Tag {
                    name,
                    is_closing,
                    is_self_closing,
                    attributes,
                    end: position + 1,
                });
            }
            b'/' => {
                is_self_closing = true;
                position += 1;
            }
            _ => {
                let (attribute, next) = parse_attribute(input, position)?;
                attributes.push(attribute);
                position = next;
            }
        }
    }
}

/// Parse a single attribute, returning it and the position just past it
fn parse_attribute(input: &str, start: usize) -> Option<(Attribute<'_>, usize)> {
    let bytes = input.as_bytes();
    let mut position = start;

    while position < bytes.len() && is_attribute_name_byte(bytes[position]) {
        position += 1;
    }

    if position == start {
        return None;
    }

    let name = &input[start..position];
    let mut value = None;

    if bytes.get(position) == Some(&b'=') {
        position += 1;

        match *bytes.get(position)? {
            quote @ (b'"' | b'\'') => {
                let value_start = position + 1;
                let closing = input[value_start..].find(quote as char)?;

                value = Some(&input[value_start..value_start + closing]);
                position = value_start + closing + 1;
            }
            _ => {
                let value_start = position;
                while position < bytes.len()
                    && !bytes[position].is_ascii_whitespace()
                    && bytes[position] != b'>'
                {
                    position += 1;
                }

                value = Some(&input[value_start..position]);
            }
        }
    }

    let attribute = Attribute {
        name,
        value,
        source: &input[start..position],
    };

    Some((attribute, position))
}

fn is_attribute_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' || byte == b':'
}
