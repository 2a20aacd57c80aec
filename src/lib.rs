//! Read, query, edit and write INI files without losing their layout.
//!
//! A [`Document`] keeps sections and keys in file order, remembers the comment lines above each
//! header or key and the inline comment after it, and writes all of that back out on save.
//! Values are stored as text and converted on demand:
//!
//! ```
//! use inidoc::Document;
//!
//! let mut doc = Document::new();
//! doc.load_str("[ISP_AE]\ngray_level = 1024 # 10-bit\n").unwrap();
//!
//! assert_eq!(doc.get("ISP_AE", "gray_level", 512_u32), 1024);
//! assert_eq!(doc.get("ISP_AE", "ae_gain", 1.0_f32), 1.0);
//!
//! doc.set("DEVICE", "dev_name", "AI_ISP");
//! assert_eq!(
//!     doc.to_string(),
//!     "[ISP_AE]\ngray_level = 1024 # 10-bit\n\n[DEVICE]\ndev_name = AI_ISP\n\n"
//! );
//! ```

#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

mod diagnostics;
mod error;
mod ordered;
mod parser;
mod section;
mod util;
mod value;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::{fmt, iter};

pub use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, TracingDiagnostics};
pub use crate::error::{DuplicateName, Error};
pub use crate::ordered::{Named, OrderedMap};
pub use crate::parser::Parser;
pub use crate::section::{Key, Section};
pub use crate::value::{FromValue, ToValue, Value};

/// Label used in diagnostics for text that did not come from a file.
const STRING_SOURCE: &str = "<string>";

/// An INI file held in memory.
pub struct Document {
    sections: OrderedMap<Section>,
    diagnostics: Box<dyn Diagnostics>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document that reports warnings through [`TracingDiagnostics`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_diagnostics(TracingDiagnostics)
    }

    #[must_use]
    pub fn with_diagnostics(diagnostics: impl Diagnostics + 'static) -> Self {
        Self {
            sections: OrderedMap::new(),
            diagnostics: Box::new(diagnostics),
        }
    }

    /// Replace the contents of the document with the file at `path`.
    ///
    /// The document is cleared first and stays empty if loading fails. Malformed lines and
    /// duplicate names are reported to the diagnostics sink and skipped.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, or if a key appears before the first section header.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        self.sections.clear();

        let data = fs::read(path).map_err(|source| Error::Read {
            path: path.to_owned(),
            source,
        })?;
        let text = util::decode_data(&data);

        self.parse(&text, &path.display().to_string())?;
        tracing::debug!(
            path = %path.display(),
            sections = self.sections.len(),
            "loaded ini file"
        );

        Ok(())
    }

    /// Same as [`load`](Self::load), reading from memory instead of a file.
    ///
    /// # Errors
    ///
    /// Fails if a key appears before the first section header.
    pub fn load_str(&mut self, text: &str) -> Result<(), Error> {
        self.sections.clear();
        self.parse(text, STRING_SOURCE)
    }

    fn parse(&mut self, text: &str, file: &str) -> Result<(), Error> {
        self.sections = Parser::new(text, file, self.diagnostics.as_ref()).into_sections()?;
        Ok(())
    }

    /// Write the document to `path`, replacing anything already there.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be created or written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let to_error = |source| Error::Write {
            path: path.to_owned(),
            source,
        };

        let mut writer = BufWriter::new(File::create(path).map_err(to_error)?);
        self.write_to(&mut writer).map_err(to_error)?;
        writer.flush().map_err(to_error)?;

        tracing::debug!(
            path = %path.display(),
            sections = self.sections.len(),
            "saved ini file"
        );

        Ok(())
    }

    /// Write the serialized document, the same text as `to_string`, into `writer`.
    ///
    /// # Errors
    ///
    /// Propagates any error from `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "{self}")
    }

    /// Look up `section.key` as a `T`.
    ///
    /// Returns `default` if the key does not exist (reporting [`DiagnosticKind::MissingValue`])
    /// or if its text is not a valid `T`. Nothing is created.
    #[must_use]
    pub fn get<T: FromValue>(&self, section: &str, key: &str, default: T) -> T {
        let Some(value) = self.value(section, key) else {
            self.diagnostics
                .report(&Diagnostic::detached(DiagnosticKind::MissingValue {
                    section: section.to_owned(),
                    key: key.to_owned(),
                }));
            return default;
        };

        value.try_get().unwrap_or(default)
    }

    /// Store `value` under `section.key`, appending the section and key if they do not exist.
    pub fn set<T: ToValue>(&mut self, section: &str, key: &str, value: T) {
        self.sections
            .get_or_insert_with(section, || Section::new(section))
            .key_or_insert(key)
            .value_mut()
            .set(value);
    }

    #[must_use]
    pub fn value(&self, section: &str, key: &str) -> Option<&Value> {
        self.sections
            .get(section)
            .and_then(|s| s.key(key))
            .map(Key::value)
    }

    #[must_use]
    pub fn has_value(&self, section: &str, key: &str) -> bool {
        self.value(section, key).is_some()
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(name)
    }

    /// Sections in file order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Append a section at the end of the document.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateName`] if a section with the same name exists; it is left untouched.
    pub fn insert_section(&mut self, section: Section) -> Result<(), DuplicateName> {
        self.sections.insert(section).map(drop)
    }

    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        self.sections.remove(name)
    }

    /// Every `(section, key, value)` triple, in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &Value)> {
        self.sections.iter().flat_map(|section| {
            iter::repeat(section.name())
                .zip(section.keys())
                .map(|(section, key)| (section, key.name(), key.value()))
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.sections
            .iter()
            .try_for_each(|section| write!(f, "{section}"))
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("sections", &self.sections)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tempfile::tempdir;

    use super::*;

    const CONFIG: &str = "\
; camera tuning
[ISP_AWB] ; white balance
r_gain = 1.1
g_gain = 1.2
b_gain = 1.3

[ISP_AE]
; 10-bit sensor
gray_level = 1024 # mid grey
ae_gain = 15

[DEVICE]
dev_name = AI_ISP

";

    fn recording() -> (Document, Rc<RefCell<Vec<Diagnostic>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let seen = Rc::clone(&seen);
            move |d: &Diagnostic| seen.borrow_mut().push(d.clone())
        };

        (Document::with_diagnostics(sink), seen)
    }

    fn loaded(text: &str) -> Document {
        let mut doc = Document::new();
        doc.load_str(text).expect("failed to parse hardcoded INI text");
        doc
    }

    fn layout(doc: &Document) -> Vec<(String, String, String)> {
        doc.entries()
            .map(|(s, k, v)| (s.to_owned(), k.to_owned(), v.as_str().to_owned()))
            .collect()
    }

    #[test]
    fn serialization_reproduces_canonical_text() {
        assert_eq!(loaded(CONFIG).to_string(), CONFIG);
    }

    #[test]
    fn round_trip_keeps_order_and_values() {
        let first = loaded(CONFIG);
        let second = loaded(&first.to_string());

        assert_eq!(
            first.sections().map(Section::name).collect::<Vec<_>>(),
            ["ISP_AWB", "ISP_AE", "DEVICE"]
        );
        assert_eq!(layout(&first), layout(&second));
        assert_eq!(first.sections, second.sections);
    }

    #[test]
    fn comments_survive_round_trip() {
        let doc = loaded("; note\n[sec]\n; inner\nkey = 1 # trailing\n");
        let text = doc.to_string();

        assert_eq!(text, "; note\n[sec]\n; inner\nkey = 1 # trailing\n\n");

        let again = loaded(&text);
        let key = again.section("sec").unwrap().key("key").unwrap();
        assert_eq!(again.section("sec").unwrap().comment(), "; note\n");
        assert_eq!(key.comment(), "; inner\n");
        assert_eq!(key.trailing_comment(), "# trailing");
        assert_eq!(key.value().as_str(), "1");
    }

    #[test]
    fn typed_get() {
        let doc = loaded(CONFIG);

        assert!((doc.get("ISP_AWB", "g_gain", 1.0_f32) - 1.2).abs() < f32::EPSILON);
        assert_eq!(doc.get("ISP_AE", "gray_level", 512_u32), 1024);
        assert_eq!(doc.get("DEVICE", "dev_name", String::new()), "AI_ISP");
    }

    #[test]
    fn unparsable_value_returns_caller_default() {
        let doc = loaded("[s]\nn = abc\n");

        assert_eq!(doc.get("s", "n", 7), 7);
        assert_eq!(doc.value("s", "n").unwrap().get::<i32>(), 0);
    }

    #[test]
    fn missing_value_falls_back_without_creating() {
        let (mut doc, seen) = recording();
        doc.load_str(CONFIG).unwrap();

        assert!((doc.get("NOPE", "nope", 1.0_f32) - 1.0).abs() < f32::EPSILON);
        assert_eq!(doc.get("ISP_AE", "nope", 3_u8), 3);
        assert!(doc.section("NOPE").is_none());
        assert_eq!(doc.section("ISP_AE").unwrap().len(), 2);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(
            seen[0].kind,
            DiagnosticKind::MissingValue {
                section: "NOPE".to_owned(),
                key: "nope".to_owned()
            }
        );
    }

    #[test]
    fn set_creates_section_and_key() {
        let mut doc = Document::new();
        doc.set("D", "name", "x");

        assert_eq!(doc.get("D", "name", String::new()), "x");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.section("D").unwrap().len(), 1);
    }

    #[test]
    fn set_overwrites_in_place() {
        let mut doc = loaded(CONFIG);
        doc.set("ISP_AWB", "r_gain", 2.5_f64);
        doc.set("ISP_AWB", "enabled", true);

        let awb = doc.section("ISP_AWB").unwrap();
        assert_eq!(
            awb.keys().map(Key::name).collect::<Vec<_>>(),
            ["r_gain", "g_gain", "b_gain", "enabled"]
        );
        assert_eq!(awb.key("r_gain").unwrap().value().as_str(), "2.5");
        assert!(doc.get("ISP_AWB", "enabled", false));
    }

    #[test]
    fn section_order_after_remove_and_reinsert() {
        let mut doc = Document::new();
        for name in ["A", "B", "C"] {
            doc.insert_section(Section::new(name)).unwrap();
        }

        let b = doc.remove_section("B").unwrap();
        assert_eq!(doc.sections().map(Section::name).collect::<Vec<_>>(), ["A", "C"]);

        doc.insert_section(b).unwrap();
        assert_eq!(
            doc.sections().map(Section::name).collect::<Vec<_>>(),
            ["A", "C", "B"]
        );
    }

    #[test]
    fn duplicate_section_is_rejected() {
        let mut doc = Document::new();
        doc.insert_section(Section::new("X").with_comment("; original\n"))
            .unwrap();

        let err = doc.insert_section(Section::new("X")).unwrap_err();

        assert_eq!(err.name(), "X");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.section("X").unwrap().comment(), "; original\n");
    }

    #[test]
    fn key_before_section_fails_and_leaves_document_empty() {
        let (mut doc, seen) = recording();
        doc.set("old", "k", 1);

        let result = doc.load_str("; header\n\nkey = 1\n[s]\na = 2\n");

        assert!(matches!(result, Err(Error::KeyBeforeSection { line: 3, .. })));
        assert!(doc.is_empty());
        assert_eq!(seen.borrow()[0].kind, DiagnosticKind::KeyBeforeSection);
    }

    #[test]
    fn load_replaces_previous_contents() {
        let mut doc = loaded(CONFIG);
        doc.load_str("[only]\nk = v\n").unwrap();

        assert_eq!(doc.sections().map(Section::name).collect::<Vec<_>>(), ["only"]);
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ini");

        let mut doc = loaded(CONFIG);
        doc.set("DEVICE", "dev_name", "renamed");
        doc.save(&path).unwrap();

        let mut reloaded = Document::new();
        reloaded.load(&path).unwrap();

        assert_eq!(reloaded.get("DEVICE", "dev_name", String::new()), "renamed");
        assert_eq!(fs::read_to_string(&path).unwrap(), doc.to_string());
    }

    #[test]
    fn empty_key_name_round_trips() {
        let doc = loaded("[s]\n= 1\n");

        assert!(doc.has_value("s", ""));
        assert_eq!(doc.to_string(), "[s]\n = 1\n\n");
        assert_eq!(loaded(&doc.to_string()).get("s", "", 0), 1);
    }

    #[test]
    fn edited_comments_are_saved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ini");

        let mut doc = loaded("[s]\nk = 1\n");
        let section = doc.section_mut("s").unwrap();
        section.set_comment("; section\n");
        section.set_trailing_comment("; header");
        let key = section.key_mut("k").unwrap();
        key.set_comment("# key\n");
        key.set_trailing_comment("# inline");
        doc.save(&path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "; section\n[s] ; header\n# key\nk = 1 # inline\n\n"
        );
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[stale]\nold = 1\n".repeat(10)).unwrap();

        loaded("[fresh]\nk = v\n").save(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[fresh]\nk = v\n\n");
    }

    #[test]
    fn load_strips_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bom.ini");
        fs::write(&path, b"\xEF\xBB\xBF[s]\nk = 1\n").unwrap();

        let mut doc = Document::new();
        doc.load(&path).unwrap();

        assert!(doc.has_value("s", "k"));
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempdir().unwrap();
        let mut doc = loaded(CONFIG);

        let err = doc.load(dir.path().join("missing.ini")).unwrap_err();

        assert!(matches!(err, Error::Read { .. }));
        assert!(doc.is_empty());
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no/such/dir/config.ini");

        let err = loaded(CONFIG).save(&path).unwrap_err();

        assert!(matches!(err, Error::Write { .. }));
    }

    #[test]
    fn load_reports_file_and_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.ini");
        fs::write(&path, "[s]\nno equals here\n").unwrap();

        let (mut doc, seen) = recording();
        doc.load(&path).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen[0].kind, DiagnosticKind::MissingEquals);
        assert_eq!(seen[0].line, Some(2));
        assert_eq!(seen[0].file, Some(path.display().to_string()));
    }
}
