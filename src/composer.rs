/// Pre-edit state of composed (IME) input
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Composition {
    #[default]
    Idle,
    Composing { buffer: String },
}

/// Buffers keystrokes while composing and hands out the committed text once.
///
/// Nothing in here touches a session: partial keystrokes never reach the
/// ledger, only the string returned by [`Composer::end`] does.
#[derive(Clone, Debug, Default)]
pub struct Composer {
    state: Composition,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) {
        if let Composition::Idle = self.state {
            self.state = Composition::Composing {
                buffer: String::new(),
            };
        }
    }

    /// Append to the pre-edit text, starting a composition if needed
    pub fn push(&mut self, c: char) {
        self.begin();
        if let Composition::Composing { buffer } = &mut self.state {
            buffer.push(c);
        }
    }

    pub fn push_str(&mut self, text: &str) {
        text.chars().for_each(|c| self.push(c));
    }

    /// Delete the last pre-edit character. Returns false when there was no
    /// composition to edit. An emptied buffer ends the composition.
    pub fn pop(&mut self) -> bool {
        let Composition::Composing { buffer } = &mut self.state else {
            return false;
        };
        buffer.pop();
        if buffer.is_empty() {
            self.state = Composition::Idle;
        }
        true
    }

    /// Finish composing; yields the committed text unless it is empty
    pub fn end(&mut self) -> Option<String> {
        match std::mem::take(&mut self.state) {
            Composition::Composing { buffer } if !buffer.is_empty() => Some(buffer),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.state = Composition::Idle;
    }

    pub fn is_composing(&self) -> bool {
        matches!(self.state, Composition::Composing { .. })
    }

    pub fn preedit(&self) -> Option<&str> {
        match &self.state {
            Composition::Composing { buffer } => Some(buffer),
            Composition::Idle => None,
        }
    }
}
