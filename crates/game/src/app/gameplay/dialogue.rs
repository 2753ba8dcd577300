use engine::Key;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum DialogueState {
    #[default]
    Closed,
    Showing {
        lines: Vec<String>,
        index: usize,
    },
    StarterSelection {
        prompt: String,
        option_count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DialogueEvent {
    /// Key not meant for the open dialogue.
    Ignored,
    Advanced,
    Finished,
    StarterChosen(usize),
    Cancelled,
}

/// Linear text prompts plus the starter-selection sub-mode.
#[derive(Debug, Clone, Default)]
pub(crate) struct DialogueController {
    state: DialogueState,
}

impl DialogueController {
    /// Replaces whatever is open. An empty script leaves the dialogue closed.
    pub(crate) fn open(&mut self, lines: Vec<String>) {
        self.state = if lines.is_empty() {
            DialogueState::Closed
        } else {
            DialogueState::Showing { lines, index: 0 }
        };
    }

    pub(crate) fn open_line(&mut self, line: impl Into<String>) {
        self.open(vec![line.into()]);
    }

    pub(crate) fn open_starter_selection(&mut self, prompt: impl Into<String>, option_count: usize) {
        self.state = DialogueState::StarterSelection {
            prompt: prompt.into(),
            option_count,
        };
    }

    pub(crate) fn close(&mut self) {
        self.state = DialogueState::Closed;
    }

    pub(crate) fn is_open(&self) -> bool {
        self.state != DialogueState::Closed
    }

    pub(crate) fn is_selecting_starter(&self) -> bool {
        matches!(self.state, DialogueState::StarterSelection { .. })
    }

    pub(crate) fn current_text(&self) -> Option<&str> {
        match &self.state {
            DialogueState::Closed => None,
            DialogueState::Showing { lines, index } => lines.get(*index).map(String::as_str),
            DialogueState::StarterSelection { prompt, .. } => Some(prompt),
        }
    }

    /// Moves to the next line; passing the last one closes the dialogue.
    pub(crate) fn advance(&mut self) -> DialogueEvent {
        let DialogueState::Showing { lines, index } = &mut self.state else {
            return DialogueEvent::Ignored;
        };
        *index += 1;
        if *index >= lines.len() {
            self.state = DialogueState::Closed;
            DialogueEvent::Finished
        } else {
            DialogueEvent::Advanced
        }
    }

    pub(crate) fn handle_key(&mut self, key: Key) -> DialogueEvent {
        match &self.state {
            DialogueState::Closed => DialogueEvent::Ignored,
            DialogueState::Showing { .. } if key.is_confirm() => self.advance(),
            DialogueState::Showing { .. } => DialogueEvent::Ignored,
            DialogueState::StarterSelection { option_count, .. } => {
                if key == Key::Escape {
                    self.close();
                    return DialogueEvent::Cancelled;
                }
                match key.digit_index() {
                    Some(index) if index < *option_count => {
                        self.close();
                        DialogueEvent::StarterChosen(index)
                    }
                    _ => DialogueEvent::Ignored,
                }
            }
        }
    }
}
