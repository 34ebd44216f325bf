//! Hand-rolled XML parser

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::xml::cursor::Cursor;
use crate::xml::model::{Declaration, Document, Element};

/// XML parser producing a [`Document`]
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser over raw input bytes
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    /// Parse an XML document
    ///
    /// The `<?xml ..?>` declaration, when present, is captured into the
    /// document; comments and other processing instructions are skipped.
    /// Only whitespace may follow the root element.
    pub fn parse(&mut self) -> Result<Document> {
        let mut document = Document::new();

        if let Some(declaration) = self.parse_prolog()? {
            document.set_declaration(declaration);
        }

        if self.cursor.is_eof() {
            return Err(self.error_at(ErrorKind::MissingRoot));
        }
        if self.cursor.current() != Some(b'<') {
            return Err(self.error_here("expected an element at the document root"));
        }

        let root = self.parse_element()?;
        document.set_root(root);
        self.cursor.skip_whitespace();

        if !self.cursor.is_eof() {
            return Err(self.error_at(ErrorKind::TrailingContent));
        }

        Ok(document)
    }

    /// Consumes leading whitespace, comments and processing instructions,
    /// capturing the XML declaration if one appears
    fn parse_prolog(&mut self) -> Result<Option<Declaration>> {
        let mut declaration = None;
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.current() != Some(b'<') {
                return Ok(declaration);
            }
            match self.cursor.peek(1) {
                Some(b'?') => {
                    if let Some(parsed) = self.parse_processing_instruction()? {
                        declaration = Some(parsed);
                    }
                }
                Some(b'!') => {
                    self.cursor.advance();
                    self.skip_declaration_or_comment()?;
                }
                _ => return Ok(declaration),
            }
        }
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.expect_byte(b'<')?;

        if self.cursor.current() == Some(b'/') {
            return Err(self.error_here("unexpected closing tag"));
        }

        let name = self.parse_name()?;
        let mut element = Element::new(name);
        self.parse_attributes(&mut element)?;

        if self.cursor.current() == Some(b'/') {
            self.cursor.advance();
            self.expect_byte(b'>')?;
            return Ok(element);
        }

        self.expect_byte(b'>')?;

        loop {
            if self.cursor.is_eof() {
                return Err(self.error_at(ErrorKind::UnexpectedEof));
            }

            if self.cursor.current() == Some(b'<') {
                match self.cursor.peek(1) {
                    Some(b'/') => {
                        self.cursor.advance_by(2);
                        let close_name = self.parse_name()?;
                        if close_name != element.name() {
                            return Err(self.error_at(ErrorKind::MismatchedTag {
                                expected: element.name().to_string(),
                                found: close_name,
                            }));
                        }
                        self.cursor.skip_whitespace();
                        self.expect_byte(b'>')?;
                        break;
                    }
                    Some(b'?') => {
                        self.parse_processing_instruction()?;
                    }
                    Some(b'!') => {
                        self.cursor.advance();
                        self.skip_declaration_or_comment()?;
                    }
                    _ => {
                        let child = self.parse_element()?;
                        element.add_child(child);
                    }
                }
                continue;
            }

            if let Some(text) = self.parse_text()? {
                element.add_text(text);
            }
        }

        Ok(element)
    }

    fn parse_attributes(&mut self, element: &mut Element) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') | Some(b'?') => break,
                Some(_) => {}
                None => return Err(self.error_at(ErrorKind::UnexpectedEof)),
            }

            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if element.attribute_value(&name).is_ok() {
                return Err(self.error_at(ErrorKind::DuplicateAttribute { name }));
            }
            element.set_attribute(name, value);
        }

        Ok(())
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = self.bytes_to_string(raw)?;
                return self.decode_entities(&text);
            }
            self.cursor.advance();
        }

        Err(self.error_here("unterminated attribute value"))
    }

    /// Parses a text run; whitespace-only text is dropped so indented
    /// documents re-parse to the tree that produced them
    fn parse_text(&mut self) -> Result<Option<String>> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = self.bytes_to_string(raw)?;
        let text = self.decode_entities(&text)?;

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.cursor.pos();

        let Some(first) = self.cursor.current() else {
            return Err(self.error_at(ErrorKind::UnexpectedEof));
        };
        if !is_name_start(first) {
            return Err(self.error_here("expected name"));
        }

        self.cursor.advance();
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let raw = self.cursor.slice_from(start);
        self.bytes_to_string(raw)
    }

    /// Parses `<?..?>`, returning declaration metadata when the target is
    /// `xml` and `None` for any other processing instruction
    fn parse_processing_instruction(&mut self) -> Result<Option<Declaration>> {
        self.cursor.advance_by(2);
        let target = self.parse_name()?;
        if target != "xml" {
            self.skip_until(b"?>")?;
            return Ok(None);
        }

        let mut pseudo = Element::new("xml");
        self.parse_attributes(&mut pseudo)?;
        self.expect_byte(b'?')?;
        self.expect_byte(b'>')?;

        let mut declaration = Declaration::new();
        if let Ok(version) = pseudo.attribute_value("version") {
            declaration = declaration.with_version(version);
        }
        if let Ok(encoding) = pseudo.attribute_value("encoding") {
            declaration = declaration.with_encoding(encoding);
        }
        Ok(Some(declaration))
    }

    fn skip_declaration_or_comment(&mut self) -> Result<()> {
        // cursor currently at '!'
        if self.cursor.peek(1) == Some(b'-') && self.cursor.peek(2) == Some(b'-') {
            self.cursor.advance_by(3);
            self.skip_until(b"-->")?;
            return Ok(());
        }

        if self.cursor.peek(1) == Some(b'[')
            && self.cursor.peek(2) == Some(b'C')
            && self.cursor.peek(3) == Some(b'D')
        {
            self.cursor.advance_by(2);
            self.skip_until(b"]]>")?;
            return Ok(());
        }

        self.skip_until(b">")
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while self.cursor.current().is_some() {
            if self.cursor.peek_bytes(pattern.len()) == Some(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error_here("unterminated markup"))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else {
            Err(self.error_here("unexpected token"))
        }
    }

    fn error_at(&self, kind: ErrorKind) -> Error {
        let pos = self.cursor.position();
        Error::at(kind, pos.offset, pos.line, pos.col)
    }

    fn error_here(&self, message: &str) -> Error {
        let pos = self.cursor.position();
        Error::with_message(
            ErrorKind::InvalidToken,
            Span::new(Pos::new(pos.offset, pos.line, pos.col), pos),
            message.to_string(),
        )
    }

    fn bytes_to_string(&self, bytes: &[u8]) -> Result<String> {
        std::str::from_utf8(bytes)
            .map(|s| s.to_string())
            .map_err(|_| self.error_here("invalid utf-8"))
    }

    fn decode_entities(&self, input: &str) -> Result<String> {
        let mut result = String::new();
        let mut chars = input.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch != '&' {
                result.push(ch);
                continue;
            }

            let mut entity = String::new();
            for next in chars.by_ref() {
                if next == ';' {
                    break;
                }
                entity.push(next);
            }

            let decoded = match entity.as_str() {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => decode_numeric_entity(&entity),
            };

            match decoded {
                Some(ch) => result.push(ch),
                None => return Err(self.error_at(ErrorKind::InvalidEntity)),
            }
        }

        Ok(result)
    }
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':')
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::model::Content;

    fn parse(input: &str) -> Result<Document> {
        Parser::new(input.as_bytes()).parse()
    }

    fn root(document: &Document) -> &Element {
        document.root().unwrap()
    }

    #[test]
    fn test_parse_simple_element() -> Result<()> {
        let document = parse("<root></root>")?;
        assert_eq!(root(&document).name(), "root");
        assert!(root(&document).children().is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_with_attributes() -> Result<()> {
        let document = parse("<root id=\"1\" name='test'></root>")?;
        assert_eq!(root(&document).attribute_value("id"), Ok("1"));
        assert_eq!(root(&document).attribute_value("name"), Ok("test"));
        Ok(())
    }

    #[test]
    fn test_parse_nested() -> Result<()> {
        let document = parse("<root><child>text</child></root>")?;
        let child = root(&document).first_element_child("child")?;
        assert_eq!(child.children().first().and_then(Content::as_text), Some("text"));
        Ok(())
    }

    #[test]
    fn test_parse_self_closing() -> Result<()> {
        let document = parse("<root><child /></root>")?;
        let child = root(&document).first_element_child("child")?;
        assert!(child.children().is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_captures_declaration() -> Result<()> {
        let document = parse("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<module/>")?;
        let declaration = document.declaration().unwrap();
        assert_eq!(declaration.version(), Some("1.0"));
        assert_eq!(declaration.encoding(), Some("UTF-8"));
        assert_eq!(root(&document).name(), "module");
        Ok(())
    }

    #[test]
    fn test_parse_skips_comments_and_whitespace() -> Result<()> {
        let document = parse("<!-- header -->\n<root>\n  <child/>\n</root>")?;
        assert_eq!(root(&document).element_children().count(), 1);
        assert!(root(&document).children().iter().all(|c| c.as_text().is_none()));
        Ok(())
    }

    #[test]
    fn test_parse_decodes_entities() -> Result<()> {
        let document = parse("<a v=\"x &amp; y\">1 &lt; 2 &#33;</a>")?;
        assert_eq!(root(&document).attribute_value("v"), Ok("x & y"));
        assert_eq!(
            root(&document).children().first().and_then(Content::as_text),
            Some("1 < 2 !")
        );
        Ok(())
    }

    #[test]
    fn test_parse_empty_input_fails() {
        let err = parse("   ").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MissingRoot);
    }

    #[test]
    fn test_parse_mismatched_tag_fails() {
        let err = parse("<a><b></a></a>").unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::MismatchedTag {
                expected: "b".to_string(),
                found: "a".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_duplicate_attribute_fails() {
        let err = parse("<a x=\"1\" x=\"2\"/>").unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::DuplicateAttribute {
                name: "x".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_trailing_content_fails() {
        let err = parse("<a/><b/>").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::TrailingContent);

        let err = parse("<a/>junk").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::TrailingContent);
    }

    #[test]
    fn test_parse_unterminated_element_fails() {
        let err = parse("<a><b></b>").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_parse_invalid_entity_fails() {
        let err = parse("<a>&bogus;</a>").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidEntity);
    }
}
