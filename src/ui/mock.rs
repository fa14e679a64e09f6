//! In-memory [`UserInterface`] for command tests.

use std::cell::RefCell;
use std::rc::Rc;

use super::{OutputMode, SearchProgress, Tone, UserInterface};

/// One line a command printed. `tone` is `None` for plain messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub tone: Option<Tone>,
    pub text: String,
}

/// Records every line and discovery run for later assertions.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    lines: Vec<Line>,
    /// `(search paths, toolchains found)` per run; `None` until finished.
    searches: Rc<RefCell<Vec<(usize, Option<usize>)>>>,
}

impl MockUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Plain messages, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.texts(None)
    }

    pub fn headers(&self) -> Vec<&str> {
        self.texts(Some(Tone::Header))
    }

    pub fn searches(&self) -> Vec<(usize, Option<usize>)> {
        self.searches.borrow().clone()
    }

    pub fn has_message(&self, needle: &str) -> bool {
        self.has(None, needle)
    }

    pub fn has_success(&self, needle: &str) -> bool {
        self.has(Some(Tone::Success), needle)
    }

    pub fn has_warning(&self, needle: &str) -> bool {
        self.has(Some(Tone::Warning), needle)
    }

    pub fn has_error(&self, needle: &str) -> bool {
        self.has(Some(Tone::Error), needle)
    }

    fn texts(&self, tone: Option<Tone>) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.tone == tone)
            .map(|l| l.text.as_str())
            .collect()
    }

    fn has(&self, tone: Option<Tone>, needle: &str) -> bool {
        self.texts(tone).iter().any(|t| t.contains(needle))
    }

    fn push(&mut self, tone: Option<Tone>, text: &str) {
        self.lines.push(Line {
            tone,
            text: text.to_string(),
        });
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.push(None, msg);
    }

    fn success(&mut self, msg: &str) {
        self.push(Some(Tone::Success), msg);
    }

    fn warning(&mut self, msg: &str) {
        self.push(Some(Tone::Warning), msg);
    }

    fn error(&mut self, msg: &str) {
        self.push(Some(Tone::Error), msg);
    }

    fn show_header(&mut self, title: &str) {
        self.push(Some(Tone::Header), title);
    }

    fn start_search(&mut self, dirs: usize) -> Box<dyn SearchProgress> {
        let mut searches = self.searches.borrow_mut();
        searches.push((dirs, None));
        Box::new(MockSearch {
            searches: Rc::clone(&self.searches),
            index: searches.len() - 1,
        })
    }
}

struct MockSearch {
    searches: Rc<RefCell<Vec<(usize, Option<usize>)>>>,
    index: usize,
}

impl SearchProgress for MockSearch {
    fn finish(&mut self, toolchains: usize) {
        if let Some(search) = self.searches.borrow_mut().get_mut(self.index) {
            search.1 = Some(toolchains);
        }
    }
}
