use std::mem;
use std::str::Lines;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::Error;
use crate::ordered::OrderedMap;
use crate::section::{Key, Section};
use crate::util::{split_inline_comment, trim};

/// Represents an on-going parse.
///
/// Works one physical line at a time. Comment lines pile up in `pending_comment` until the next
/// section header or key claims them; blank lines do not reset the pile.
pub struct Parser<'a> {
    lines: Lines<'a>,
    line: usize,
    file: &'a str,
    diagnostics: &'a dyn Diagnostics,
    pending_comment: String,
    current_section: Option<String>,
}

impl<'a> Parser<'a> {
    /// `file` only labels diagnostics; the text is already in memory.
    #[must_use]
    pub fn new(text: &'a str, file: &'a str, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            lines: text.lines(),
            line: 0,
            file,
            diagnostics,
            pending_comment: String::new(),
            current_section: None,
        }
    }
}

impl Parser<'_> {
    /// Run the parse to completion.
    ///
    /// Malformed lines and duplicate names are reported and skipped. A key before the first
    /// section header stops everything.
    pub fn into_sections(mut self) -> Result<OrderedMap<Section>, Error> {
        let mut sections = OrderedMap::<Section>::new();

        while let Some(raw) = self.lines.next() {
            self.line += 1;
            let line = trim(raw);

            match line.chars().next() {
                None => {}
                Some('#' | ';') => {
                    self.pending_comment.push_str(line);
                    self.pending_comment.push('\n');
                }
                Some('[') => self.parse_section(line, &mut sections),
                Some(_) => self.parse_key(line, &mut sections)?,
            }
        }

        Ok(sections)
    }

    fn parse_section(&mut self, line: &str, sections: &mut OrderedMap<Section>) {
        let Some(close) = line.find(']') else {
            self.warn(DiagnosticKind::MissingCloseBracket);
            return;
        };

        let name = trim(&line[1..close]);
        let trailing_comment = trim(&line[close + 1..]);

        // A repeated header is skipped: the first definition keeps its comments and the pending
        // comment waits for the next item. Keys below it still go to the first definition.
        if sections.contains(name) {
            self.warn(DiagnosticKind::DuplicateSection {
                name: name.to_owned(),
            });
        } else {
            let section = Section::new(name)
                .with_comment(mem::take(&mut self.pending_comment))
                .with_trailing_comment(trailing_comment);
            _ = sections.insert(section);
        }

        self.current_section = Some(name.to_owned());
    }

    fn parse_key(&mut self, line: &str, sections: &mut OrderedMap<Section>) -> Result<(), Error> {
        let Some(equal) = line.find('=') else {
            self.warn(DiagnosticKind::MissingEquals);
            return Ok(());
        };

        let Some(section_name) = self.current_section.as_deref() else {
            self.warn(DiagnosticKind::KeyBeforeSection);
            return Err(Error::KeyBeforeSection {
                file: self.file.to_owned(),
                line: self.line,
            });
        };

        let name = trim(&line[..equal]);

        // The current section was inserted when its header was read.
        let section = sections.get_or_insert_with(section_name, || Section::new(section_name));

        if section.contains_key(name) {
            let kind = DiagnosticKind::DuplicateKey {
                section: section_name.to_owned(),
                key: name.to_owned(),
            };
            self.warn(kind);
            return Ok(());
        }

        let (value, trailing_comment) = split_inline_comment(&line[equal + 1..]);
        let key = Key::new(name)
            .with_value(value)
            .with_comment(mem::take(&mut self.pending_comment))
            .with_trailing_comment(trailing_comment);
        _ = section.insert_key(key);

        Ok(())
    }

    fn warn(&self, kind: DiagnosticKind) {
        self.diagnostics
            .report(&Diagnostic::at_line(self.file, self.line, kind));
    }
}
