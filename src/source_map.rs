//! Source-map construction
//!
//! The emitter drives an `OutputBuffer`: `open`/`close` push mappings for a
//! node's span at the current output position, `write` advances the cursor
//! past emitted text, and `prepend` shifts every existing mapping so a
//! buffer can be inserted at the front. Serialization produces the V3
//! source-map JSON with Base64-VLQ mappings.

use crate::context::Context;
use crate::error::{CompilerError, Result};
use crate::position::{Offset, Position, SourceSpan};
use serde::Serialize;

/// One `(original, generated)` position pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub original: Position,
    pub generated: Position,
}

#[derive(Debug, Clone)]
pub struct SourceMap {
    pub mappings: Vec<Mapping>,
    pub current_position: Position,
    /// Value of the emitted `file` key
    pub file: String,
}

impl Default for SourceMap {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceMap {
    pub fn new() -> Self {
        Self {
            mappings: Vec::new(),
            current_position: Position::new(0, 0, 0),
            file: "stdin".to_string(),
        }
    }

    pub fn with_file(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::new()
        }
    }

    /// Map the start of a node's span to the current output position.
    pub fn add_open_mapping(&mut self, span: &SourceSpan) {
        self.mappings.push(Mapping {
            original: span.position,
            generated: self.current_position,
        });
    }

    /// Map the end of a node's span (start plus offset) to the current
    /// output position.
    pub fn add_close_mapping(&mut self, span: &SourceSpan) {
        self.mappings.push(Mapping {
            original: span.end(),
            generated: self.current_position,
        });
    }

    /// Advance the output cursor.
    pub fn append(&mut self, offset: Offset) {
        self.current_position += offset;
    }

    /// Shift every existing mapping (and the cursor) to make room for a
    /// buffer of the given extent at the front.
    pub fn prepend(&mut self, offset: Offset) {
        if !offset.is_zero() {
            for mapping in &mut self.mappings {
                // columns move only on the first old line
                if mapping.generated.line == 0 {
                    mapping.generated.column += offset.column;
                }
                mapping.generated.line += offset.line;
            }
        }
        if self.current_position.line == 0 {
            self.current_position.column += offset.column;
        }
        self.current_position.line += offset.line;
    }

    /// Advance past an already-emitted buffer.
    pub fn append_buffer(&mut self, out: &OutputBuffer) {
        self.append(Offset::of_text(&out.buffer));
    }

    /// Prepend a buffer: validate that its mappings lie within its own
    /// extent, shift the existing mappings, then unshift the incoming ones.
    pub fn prepend_buffer(&mut self, out: &OutputBuffer) -> Result<()> {
        let size = out.map.current_position;
        for mapping in &out.map.mappings {
            if mapping.generated.line > size.line {
                return Err(CompilerError::source_map(
                    "prepended source map has an illegal line",
                ));
            }
            if mapping.generated.line == size.line && mapping.generated.column > size.column {
                return Err(CompilerError::source_map(
                    "prepended source map has an illegal column",
                ));
            }
        }
        self.prepend(Offset::of_text(&out.buffer));
        let mut merged = out.map.mappings.clone();
        merged.extend(self.mappings.drain(..));
        self.mappings = merged;
        Ok(())
    }

    /// Translate a generated position back to the original one, if a
    /// mapping was recorded for it.
    pub fn remap(&self, generated: Position) -> Option<Position> {
        self.mappings
            .iter()
            .find(|m| {
                m.generated.file == generated.file
                    && m.generated.line == generated.line
                    && m.generated.column == generated.column
            })
            .map(|m| m.original)
    }

    /// File indices referenced by the mappings, deduplicated in order of
    /// first appearance; these index the include table.
    fn source_indices(&self) -> Vec<usize> {
        let mut indices = Vec::new();
        for mapping in &self.mappings {
            if !indices.contains(&mapping.original.file) {
                indices.push(mapping.original.file);
            }
        }
        indices
    }

    /// Serialize the mapping stream: one group per generated line separated
    /// by `;`, entries within a line separated by `,`, each entry up to four
    /// signed VLQ deltas (generated column, source index, original line,
    /// original column). The generated-column counter resets on every new
    /// line; the other counters persist.
    pub fn serialize_mappings(&self) -> String {
        let sources = self.source_indices();
        let mut result = String::new();

        let mut previous_generated_line = 0usize;
        let mut previous_generated_column = 0i64;
        let mut previous_original_line = 0i64;
        let mut previous_original_column = 0i64;
        let mut previous_original_file = 0i64;

        for (i, mapping) in self.mappings.iter().enumerate() {
            let generated_line = mapping.generated.line;
            if generated_line != previous_generated_line {
                previous_generated_column = 0;
                if generated_line > previous_generated_line {
                    for _ in 0..(generated_line - previous_generated_line) {
                        result.push(';');
                    }
                    previous_generated_line = generated_line;
                }
            } else if i > 0 {
                result.push(',');
            }

            let source_index = sources
                .iter()
                .position(|&f| f == mapping.original.file)
                .unwrap_or(0) as i64;

            encode_vlq(
                mapping.generated.column as i64 - previous_generated_column,
                &mut result,
            );
            previous_generated_column = mapping.generated.column as i64;

            encode_vlq(source_index - previous_original_file, &mut result);
            previous_original_file = source_index;

            encode_vlq(
                mapping.original.line as i64 - previous_original_line,
                &mut result,
            );
            previous_original_line = mapping.original.line as i64;

            encode_vlq(
                mapping.original.column as i64 - previous_original_column,
                &mut result,
            );
            previous_original_column = mapping.original.column as i64;
        }

        result
    }

    /// Produce the V3 source-map JSON.
    pub fn generate_source_map(&self, ctx: &Context) -> Result<String> {
        let indices = self.source_indices();
        let sources: Vec<&str> = indices
            .iter()
            .map(|&i| ctx.file_path(i).unwrap_or(""))
            .collect();
        let sources_content: Vec<&str> = if ctx.options.source_map_contents {
            indices
                .iter()
                .map(|&i| ctx.file_contents(i).unwrap_or(""))
                .collect()
        } else {
            Vec::new()
        };

        let json = SourceMapJson {
            version: 3,
            source_root: if ctx.options.source_map_root.is_empty() {
                None
            } else {
                Some(ctx.options.source_map_root.as_str())
            },
            file: &self.file,
            sources,
            sources_content,
            mappings: self.serialize_mappings(),
            names: Vec::new(),
        };

        serde_json::to_string(&json).map_err(|e| CompilerError::source_map(e.to_string()))
    }
}

/// Field order matches the required key order of the emitted JSON.
#[derive(Serialize)]
struct SourceMapJson<'a> {
    version: u32,
    #[serde(rename = "sourceRoot", skip_serializing_if = "Option::is_none")]
    source_root: Option<&'a str>,
    file: &'a str,
    sources: Vec<&'a str>,
    #[serde(rename = "sourcesContent")]
    sources_content: Vec<&'a str>,
    mappings: String,
    names: Vec<String>,
}

const BASE64_CHARS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Base64-VLQ: groups of 5 data bits, least-significant first, bit 6 as
/// continuation; the sign lives in the LSB of the first group.
pub fn encode_vlq(value: i64, out: &mut String) {
    let mut vlq: u64 = if value < 0 {
        (((-value) as u64) << 1) | 1
    } else {
        (value as u64) << 1
    };
    loop {
        let mut digit = (vlq & 0x1f) as usize;
        vlq >>= 5;
        if vlq != 0 {
            digit |= 0x20;
        }
        out.push(BASE64_CHARS[digit] as char);
        if vlq == 0 {
            break;
        }
    }
}

/// Text buffer paired with the source map describing it.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    pub buffer: String,
    pub map: SourceMap,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(file: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            map: SourceMap::with_file(file),
        }
    }

    /// Record a mapping for a node about to be emitted.
    pub fn open(&mut self, span: &SourceSpan) {
        self.map.add_open_mapping(span);
    }

    /// Record a mapping for the end of an emitted node.
    pub fn close(&mut self, span: &SourceSpan) {
        self.map.add_close_mapping(span);
    }

    /// Emit text, advancing the cursor.
    pub fn write(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.map.append(Offset::of_text(text));
    }

    /// Append another buffer's text, advancing the cursor past it.
    pub fn append(&mut self, other: &OutputBuffer) {
        self.buffer.push_str(&other.buffer);
        self.map.append_buffer(other);
    }

    /// Insert another buffer at the front, shifting every mapping.
    pub fn prepend(&mut self, other: &OutputBuffer) -> Result<()> {
        self.map.prepend_buffer(other)?;
        self.buffer.insert_str(0, &other.buffer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CompilerOptions;

    /// Inverse of `encode_vlq`, for roundtrip checks.
    fn decode_vlq(text: &str) -> Vec<i64> {
        let mut values = Vec::new();
        let mut shift = 0u32;
        let mut accum: u64 = 0;
        for ch in text.chars() {
            let digit = BASE64_CHARS
                .iter()
                .position(|&c| c as char == ch)
                .expect("invalid VLQ digit") as u64;
            accum |= (digit & 0x1f) << shift;
            if digit & 0x20 != 0 {
                shift += 5;
            } else {
                let value = if accum & 1 != 0 {
                    -((accum >> 1) as i64)
                } else {
                    (accum >> 1) as i64
                };
                values.push(value);
                shift = 0;
                accum = 0;
            }
        }
        values
    }

    fn decode_mappings(text: &str) -> Vec<(usize, Vec<Vec<i64>>)> {
        text.split(';')
            .enumerate()
            .map(|(line, group)| {
                let entries = if group.is_empty() {
                    Vec::new()
                } else {
                    group.split(',').map(decode_vlq).collect()
                };
                (line, entries)
            })
            .collect()
    }

    fn span_at(file: usize, line: usize, column: usize) -> SourceSpan {
        SourceSpan::new(Position::new(file, line, column), Offset::new(0, 0))
    }

    #[test]
    fn test_vlq_known_values() {
        let mut out = String::new();
        encode_vlq(0, &mut out);
        assert_eq!(out, "A");
        out.clear();
        encode_vlq(1, &mut out);
        assert_eq!(out, "C");
        out.clear();
        encode_vlq(-1, &mut out);
        assert_eq!(out, "D");
        out.clear();
        encode_vlq(16, &mut out);
        assert_eq!(out, "gB");
        out.clear();
        encode_vlq(8, &mut out);
        assert_eq!(out, "Q");
    }

    #[test]
    fn test_vlq_roundtrip() {
        let values = [0, 1, -1, 15, 16, -16, 31, 32, 511, -512, 12345];
        let mut encoded = String::new();
        for v in values {
            encode_vlq(v, &mut encoded);
        }
        assert_eq!(decode_vlq(&encoded), values.to_vec());
    }

    #[test]
    fn test_single_line_two_mappings() {
        // emitting a{color:red} with mappings at the rule start and at the
        // start of the value
        let mut out = OutputBuffer::new();
        out.open(&span_at(0, 0, 0));
        out.write("a{color:");
        out.open(&span_at(0, 0, 8));
        out.write("red}");

        let serialized = out.map.serialize_mappings();
        assert_eq!(serialized, "AAAA,QAAQ");
        assert!(!serialized.contains(';'));
        assert_eq!(serialized.matches(',').count(), 1);
    }

    #[test]
    fn test_mappings_roundtrip() {
        let mut map = SourceMap::new();
        map.add_open_mapping(&span_at(0, 0, 0));
        map.append(Offset::of_text("a {\n  "));
        map.add_open_mapping(&span_at(0, 0, 4));
        map.append(Offset::of_text("color: red; }\n"));
        map.add_open_mapping(&span_at(0, 1, 0));

        let decoded = decode_mappings(&map.serialize_mappings());
        // reconstruct absolute (generated, source, original) triples
        let mut triples = Vec::new();
        let (mut gen_col, mut src, mut orig_line, mut orig_col) = (0i64, 0i64, 0i64, 0i64);
        for (gen_line, entries) in decoded {
            gen_col = 0;
            for entry in entries {
                assert_eq!(entry.len(), 4);
                gen_col += entry[0];
                src += entry[1];
                orig_line += entry[2];
                orig_col += entry[3];
                triples.push((gen_line, gen_col, src, orig_line, orig_col));
            }
        }
        let expected: Vec<(usize, i64, i64, i64, i64)> = map
            .mappings
            .iter()
            .map(|m| {
                (
                    m.generated.line,
                    m.generated.column as i64,
                    0,
                    m.original.line as i64,
                    m.original.column as i64,
                )
            })
            .collect();
        assert_eq!(triples, expected);
    }

    #[test]
    fn test_generated_column_resets_per_line() {
        let mut map = SourceMap::new();
        map.add_open_mapping(&span_at(0, 0, 5));
        map.append(Offset::of_text("xxxxx\n"));
        map.add_open_mapping(&span_at(0, 1, 5));

        let serialized = map.serialize_mappings();
        let groups: Vec<&str> = serialized.split(';').collect();
        assert_eq!(groups.len(), 2);
        // second line's first entry encodes an absolute column of 0
        let second = decode_vlq(groups[1]);
        assert_eq!(second[0], 0);
        // original line delta continues from the previous counter
        assert_eq!(second[2], 1);
    }

    #[test]
    fn test_prepend_shifts_mappings() {
        let mut main = OutputBuffer::new();
        main.open(&span_at(0, 0, 0));
        main.write("a { color: red; }");

        let mut header = OutputBuffer::new();
        header.write("@charset \"UTF-8\";\n");

        main.prepend(&header).unwrap();
        // original first-line mapping moved one line down, column untouched
        // because the prepended buffer ends with a newline
        assert_eq!(main.map.mappings[0].generated, Position::new(0, 1, 0));
        assert!(main.buffer.starts_with("@charset"));
        assert!(main.buffer.ends_with("red; }"));
    }

    #[test]
    fn test_prepend_same_line_shifts_columns() {
        let mut main = OutputBuffer::new();
        main.open(&span_at(0, 0, 0));
        main.write("b{}");

        let mut front = OutputBuffer::new();
        front.write("a{}");

        main.prepend(&front).unwrap();
        assert_eq!(main.map.mappings[0].generated, Position::new(0, 0, 3));
        assert_eq!(main.buffer, "a{}b{}");
    }

    #[test]
    fn test_prepend_rejects_out_of_bounds_mappings() {
        let mut main = OutputBuffer::new();
        main.write("x");

        let mut beyond = OutputBuffer::new();
        beyond.write("y");
        // a mapping past the buffer's own extent
        beyond.map.mappings.push(Mapping {
            original: Position::new(0, 0, 0),
            generated: Position::new(0, 5, 0),
        });

        let result = main.prepend(&beyond);
        assert!(matches!(result, Err(CompilerError::SourceMap { .. })));
    }

    #[test]
    fn test_prepend_merges_mapping_order() {
        let mut main = OutputBuffer::new();
        main.open(&span_at(0, 5, 0));
        main.write("tail");

        let mut front = OutputBuffer::new();
        front.open(&span_at(0, 1, 0));
        front.write("front\n");

        main.prepend(&front).unwrap();
        let mappings = main.map.mappings.clone();
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[0].original.line, 1);
        assert_eq!(mappings[1].original.line, 5);
        assert_eq!(mappings[1].generated.line, 1);
    }

    #[test]
    fn test_remap() {
        let mut map = SourceMap::new();
        map.add_open_mapping(&span_at(0, 3, 7));
        map.append(Offset::of_text("abc"));
        assert_eq!(
            map.remap(Position::new(0, 0, 0)),
            Some(Position::new(0, 3, 7))
        );
        assert_eq!(map.remap(Position::new(0, 0, 1)), None);
    }

    #[test]
    fn test_generate_source_map_json() {
        let mut ctx = Context::new(CompilerOptions {
            source_map_contents: true,
            ..CompilerOptions::default()
        });
        ctx.add_file("input.styl", "a { color: red }");

        let mut out = OutputBuffer::with_file("output.css");
        out.open(&span_at(0, 0, 0));
        out.write("a{color:red}");

        let json = out.map.generate_source_map(&ctx).unwrap();
        assert!(json.starts_with("{\"version\":3,"));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["version"], 3);
        assert_eq!(parsed["file"], "output.css");
        assert_eq!(parsed["sources"][0], "input.styl");
        assert_eq!(parsed["sourcesContent"][0], "a { color: red }");
        assert_eq!(parsed["mappings"], "AAAA");
        assert_eq!(parsed["names"].as_array().unwrap().len(), 0);
        assert!(parsed.get("sourceRoot").is_none());
    }

    #[test]
    fn test_source_root_passthrough() {
        let mut ctx = Context::new(CompilerOptions {
            source_map_root: "/src".to_string(),
            ..CompilerOptions::default()
        });
        ctx.add_file("input.styl", "");
        let map = SourceMap::new();
        let json = map.generate_source_map(&ctx).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["sourceRoot"], "/src");
    }

    #[test]
    fn test_sources_deduplicated_in_first_appearance_order() {
        let mut ctx = Context::new(CompilerOptions::default());
        ctx.add_file("a.styl", "");
        ctx.add_file("b.styl", "");

        let mut map = SourceMap::new();
        map.add_open_mapping(&span_at(1, 0, 0));
        map.add_open_mapping(&span_at(0, 0, 0));
        map.add_open_mapping(&span_at(1, 2, 0));

        let json = map.generate_source_map(&ctx).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["sources"][0], "b.styl");
        assert_eq!(parsed["sources"][1], "a.styl");
    }
}
