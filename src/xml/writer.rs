//! XML serialization at the two supported formats

use crate::xml::model::{Content, Declaration, Document, Element};

/// Output format for serialization
///
/// Both formats are exact: the same tree always produces the same bytes, so
/// rewritten documents diff cleanly under version control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// No whitespace between elements
    Concise,
    /// One element per line, two-space nested indentation
    Pretty,
}

pub(crate) fn write_document(document: &Document, format: Format) -> String {
    let mut output = String::new();
    if let Some(declaration) = document.declaration() {
        write_declaration(declaration, &mut output);
        if format == Format::Pretty {
            output.push('\n');
        }
    }
    if let Some(root) = document.root() {
        match format {
            Format::Concise => write_concise(root, &mut output),
            Format::Pretty => write_pretty(root, 0, &mut output),
        }
    }
    output
}

pub(crate) fn write_element(element: &Element, format: Format) -> String {
    let mut output = String::new();
    match format {
        Format::Concise => write_concise(element, &mut output),
        Format::Pretty => write_pretty(element, 0, &mut output),
    }
    output
}

fn write_declaration(declaration: &Declaration, output: &mut String) {
    output.push_str("<?xml");
    if let Some(version) = declaration.version() {
        output.push_str(" version=\"");
        output.push_str(&escape_attribute(version));
        output.push('"');
    }
    if let Some(encoding) = declaration.encoding() {
        output.push_str(" encoding=\"");
        output.push_str(&escape_attribute(encoding));
        output.push('"');
    }
    output.push_str("?>");
}

fn write_open_tag(element: &Element, output: &mut String) {
    output.push('<');
    output.push_str(element.name());
    for (key, value) in element.attributes() {
        output.push(' ');
        output.push_str(key);
        output.push_str("=\"");
        output.push_str(&escape_attribute(value));
        output.push('"');
    }
}

fn write_concise(element: &Element, output: &mut String) {
    write_open_tag(element, output);

    if element.children().is_empty() {
        output.push_str("/>");
        return;
    }

    output.push('>');
    for child in element.children() {
        match child {
            Content::Element(child) => write_concise(child, output),
            Content::Text(text) => output.push_str(&escape_text(text)),
        }
    }
    output.push_str("</");
    output.push_str(element.name());
    output.push('>');
}

fn write_pretty(element: &Element, depth: usize, output: &mut String) {
    for _ in 0..depth {
        output.push_str("  ");
    }

    if element.children().is_empty() {
        write_open_tag(element, output);
        output.push_str("/>");
        return;
    }

    // Text-bearing elements render their content inline on one line;
    // element-only children go one per line.
    let has_text = element
        .children()
        .iter()
        .any(|child| matches!(child, Content::Text(_)));
    if has_text {
        write_concise(element, output);
        return;
    }

    write_open_tag(element, output);
    output.push('>');
    for child in element.children() {
        if let Content::Element(child) = child {
            output.push('\n');
            write_pretty(child, depth + 1, output);
        }
    }
    output.push('\n');
    for _ in 0..depth {
        output.push_str("  ");
    }
    output.push_str("</");
    output.push_str(element.name());
    output.push('>');
}

fn escape_attribute(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("module")
            .with_attribute("type", "JAVA_MODULE")
            .with_child(
                Element::new("component")
                    .with_attribute("name", "NewModuleRootManager")
                    .with_child(Element::new("output").with_attribute("url", "file://x")),
            )
    }

    #[test]
    fn test_concise_output() {
        assert_eq!(
            sample().to_xml_string(Format::Concise),
            "<module type=\"JAVA_MODULE\"><component name=\"NewModuleRootManager\"><output url=\"file://x\"/></component></module>"
        );
    }

    #[test]
    fn test_pretty_output() {
        assert_eq!(
            sample().to_xml_string(Format::Pretty),
            "<module type=\"JAVA_MODULE\">\n  <component name=\"NewModuleRootManager\">\n    <output url=\"file://x\"/>\n  </component>\n</module>"
        );
    }

    #[test]
    fn test_empty_element_self_closes() {
        assert_eq!(
            Element::new("exclude-output").to_xml_string(Format::Concise),
            "<exclude-output/>"
        );
    }

    #[test]
    fn test_attribute_escaping() {
        let element = Element::new("a").with_attribute("v", "x<y & \"z\"");
        assert_eq!(
            element.to_xml_string(Format::Concise),
            "<a v=\"x&lt;y &amp; &quot;z&quot;\"/>"
        );
    }

    #[test]
    fn test_text_renders_inline_in_pretty() {
        let mut element = Element::new("a");
        element.add_text("1 < 2");
        let pretty = Element::new("root")
            .with_child(element)
            .to_xml_string(Format::Pretty);
        assert_eq!(pretty, "<root>\n  <a>1 &lt; 2</a>\n</root>");
    }

    #[test]
    fn test_declaration_rendering() {
        let document = Document::new()
            .with_declaration(Declaration::new().with_version("1.0").with_encoding("UTF-8"))
            .with_root(Element::new("module"));
        assert_eq!(
            document.to_xml_string(Format::Concise),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><module/>"
        );
        assert_eq!(
            document.to_xml_string(Format::Pretty),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<module/>"
        );
    }
}
