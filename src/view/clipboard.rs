//! Clipboard export. The system clipboard itself belongs to the host.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The regular copy/paste clipboard.
    Standard,
    /// The X11-style primary selection.
    Selection,
}

pub trait Clipboard {
    fn set_text(&mut self, target: Target, text: &str);
}

/// Puts `text` on every clipboard target.
pub fn publish(clipboard: &mut dyn Clipboard, text: &str) {
    clipboard.set_text(Target::Standard, text);
    clipboard.set_text(Target::Selection, text);
}

/// In-process clipboard, for hosts without one and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    pub standard: Option<String>,
    pub selection: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, target: Target, text: &str) {
        match target {
            Target::Standard => self.standard = Some(text.to_string()),
            Target::Selection => self.selection = Some(text.to_string()),
        }
    }
}
