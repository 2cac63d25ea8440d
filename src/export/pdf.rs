//! Minimal PDF 1.4 writer for text reports
//!
//! Uses the two standard Helvetica faces so no fonts are embedded. Text is
//! encoded as WinAnsi, wrapped by an average-glyph-width estimate and
//! paginated onto A4 pages.

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 56.0;
/// Average Helvetica advance as a fraction of the font size
const AVG_GLYPH_WIDTH: f32 = 0.5;

const BODY_SIZE: f32 = 11.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Regular,
    Bold,
}

impl Face {
    fn resource(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
        }
    }
}

/// Lays out lines top-to-bottom and emits one content stream per page
struct Layout {
    pages: Vec<Vec<u8>>,
    current: Vec<u8>,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }

    /// Wrap `text` and place it, breaking pages as needed
    fn text(&mut self, text: &str, face: Face, size: f32, indent: f32) {
        let leading = size * 1.4;
        let usable = PAGE_WIDTH - 2.0 * MARGIN - indent;
        let max_chars = ((usable / (size * AVG_GLYPH_WIDTH)) as usize).max(1);

        for line in wrap(text, max_chars) {
            if self.y - leading < MARGIN {
                self.break_page();
            }
            self.y -= leading;
            self.current.extend_from_slice(
                format!(
                    "BT /{} {:.1} Tf {:.2} {:.2} Td (",
                    face.resource(),
                    size,
                    MARGIN + indent,
                    self.y
                )
                .as_bytes(),
            );
            self.current.extend(pdf_string(&line));
            self.current.extend_from_slice(b") Tj ET\n");
        }
    }

    fn finish(mut self) -> Vec<Vec<u8>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// Build a PDF document for a report
pub fn generate(report: &str, query: &str, generated_at: &str) -> Vec<u8> {
    let mut layout = Layout::new();

    layout.text("Research Report", Face::Bold, 20.0, 0.0);
    layout.gap(6.0);
    layout.text(&format!("Query: {}", query), Face::Regular, BODY_SIZE, 0.0);
    layout.text(
        &format!("Generated: {}", generated_at),
        Face::Regular,
        BODY_SIZE,
        0.0,
    );
    layout.gap(14.0);

    for raw in report.lines() {
        let line = raw.trim();
        if line.is_empty() {
            layout.gap(BODY_SIZE * 0.6);
            continue;
        }

        if let Some(rest) = line.strip_prefix("### ") {
            layout.gap(4.0);
            layout.text(&plain(rest), Face::Bold, 13.0, 0.0);
        } else if let Some(rest) = line.strip_prefix("## ") {
            layout.gap(6.0);
            layout.text(&plain(rest), Face::Bold, 15.0, 0.0);
        } else if let Some(rest) = line.strip_prefix("# ") {
            layout.gap(8.0);
            layout.text(&plain(rest), Face::Bold, 18.0, 0.0);
        } else if let Some(rest) = line
            .strip_prefix("- ")
            .or_else(|| line.strip_prefix("* "))
        {
            layout.text(&format!("- {}", plain(rest)), Face::Regular, BODY_SIZE, 14.0);
        } else {
            layout.text(&plain(line), Face::Regular, BODY_SIZE, 0.0);
        }
    }

    assemble(&layout.finish())
}

/// Serialize pages into a complete file with a valid xref table
fn assemble(pages: &[Vec<u8>]) -> Vec<u8> {
    // 1 catalog, 2 page tree, 3-4 fonts, then (page, contents) pairs
    let first_page = 5;
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", first_page + 2 * i))
        .collect();

    let mut objects: Vec<Vec<u8>> = vec![
        b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        )
        .into_bytes(),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_vec(),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_vec(),
    ];

    for (i, content) in pages.iter().enumerate() {
        let contents_id = first_page + 2 * i + 1;
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH, PAGE_HEIGHT, contents_id
            )
            .into_bytes(),
        );

        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(content);
        stream.extend_from_slice(b"\nendstream");
        objects.push(stream);
    }

    let mut out: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{:010} 00000 n \n", offset));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));
    out.extend_from_slice(xref.as_bytes());
    out
}

/// Drop emphasis markers and control characters
fn plain(text: &str) -> String {
    text.replace("**", "")
        .chars()
        .filter_map(|c| match c {
            '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// WinAnsiEncoding byte for `c`, if the standard fonts can show it
fn win_ansi(c: char) -> Option<u8> {
    let byte = match c {
        ' '..='~' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Body of a PDF literal string: WinAnsi bytes with `\\`, `(` and `)`
/// escaped. Characters outside WinAnsi become `?`.
fn pdf_string(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in plain(text).chars() {
        match win_ansi(c).unwrap_or(b'?') {
            byte @ (b'\\' | b'(' | b')') => out.extend_from_slice(&[b'\\', byte]),
            byte => out.push(byte),
        }
    }
    out
}

/// Greedy word wrap; words longer than a line are split
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_document_structure() {
        let pdf = generate("# Summary\nHello (world)", "q", "2025-01-01 00:00:00");
        let text = as_text(&pdf);

        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("/Type /Catalog"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("(Hello \\(world\\)) Tj"));
        assert!(text.contains("(Summary) Tj"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let pdf = generate("Some text", "q", "now");
        let text = as_text(&pdf);

        let startxref = text.rfind("startxref\n").unwrap();
        let offset: usize = text[startxref + 10..]
            .lines()
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert!(text[offset..].starts_with("xref\n"));

        let entries: Vec<&str> = text[offset..]
            .lines()
            .skip(3)
            .take_while(|l| !l.starts_with("trailer"))
            .collect();
        for (i, entry) in entries.iter().enumerate() {
            let object_offset: usize = entry[..10].parse().unwrap();
            assert!(
                text[object_offset..].starts_with(&format!("{} 0 obj", i + 1)),
                "object {} misplaced",
                i + 1
            );
        }
    }

    #[test]
    fn test_stream_length_matches_content() {
        let pdf = as_text(&generate("line", "q", "now"));
        let start = pdf.find("<< /Length ").unwrap() + 11;
        let length: usize = pdf[start..].split(' ').next().unwrap().parse().unwrap();
        let stream_start = pdf[start..].find("stream\n").unwrap() + start + 7;
        let stream_end = pdf[stream_start..].find("\nendstream").unwrap() + stream_start;
        assert_eq!(stream_end - stream_start, length);
    }

    #[test]
    fn test_long_report_paginates() {
        let report = (0..200)
            .map(|i| format!("- Item number {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let text = as_text(&generate(&report, "q", "now"));
        let count = text.matches("/Type /Page ").count();
        assert!(count > 1, "expected multiple pages, got {}", count);
        assert!(text.contains(&format!("/Count {}", count)));
    }

    #[test]
    fn test_plain_strips_markup() {
        assert_eq!(plain("**Bold**\tcaf\u{e9}\u{7}"), "Bold caf\u{e9}");
    }

    #[test]
    fn test_pdf_string_uses_win_ansi() {
        assert_eq!(
            pdf_string("Caf\u{e9} in Z\u{fc}rich raised \u{20ac}5M, \u{a3}2M"),
            b"Caf\xe9 in Z\xfcrich raised \x805M, \xa32M".to_vec()
        );
        assert_eq!(
            pdf_string("\u{201C}a\u{201D} \u{2014} (b) \\"),
            b"\x93a\x94 \x97 \\(b\\) \\\\".to_vec()
        );
        assert_eq!(pdf_string("\u{4e2d}\u{1F600}"), b"??".to_vec());
    }

    #[test]
    fn test_non_ascii_report_keeps_latin_text() {
        let pdf = generate("Caf\u{e9} \u{20ac}5M", "Z\u{fc}rich", "now");
        assert!(contains(&pdf, b"(Caf\xe9 \x805M) Tj"));
        assert!(contains(&pdf, b"(Query: Z\xfcrich) Tj"));
        assert!(!contains(&pdf, b"Caf?"));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("aaa bbb ccc", 7), vec!["aaa bbb", "ccc"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap("   ", 10).is_empty());
    }
}
