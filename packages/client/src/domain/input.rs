//! Input activity seen by the line editor.

/// What the input thread reports to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A submitted line
    Line(String),
    /// The chat line being edited changed
    Keystroke,
    /// A chat line in progress was cleared or turned into a command
    Abandoned,
}

/// Turns successive editor buffers into keystroke notices
///
/// Only chat text counts as typing; command lines (starting with `/`) and
/// an empty buffer do not.
#[derive(Debug, Default)]
pub struct KeystrokeTracker {
    last: String,
    typing: bool,
}

impl KeystrokeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the current buffer and return the notice it implies, if any
    pub fn observe(&mut self, line: &str) -> Option<InputEvent> {
        let chatting = !line.trim().is_empty() && !line.starts_with('/');

        if !chatting {
            self.last.clear();
            if self.typing {
                self.typing = false;
                return Some(InputEvent::Abandoned);
            }
            return None;
        }

        if line == self.last {
            return None;
        }
        self.last = line.to_string();
        self.typing = true;
        Some(InputEvent::Keystroke)
    }

    /// Forget the buffer once a line has been submitted
    pub fn reset(&mut self) {
        self.last.clear();
        self.typing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_edit_of_chat_text_is_a_keystroke() {
        // テスト項目: チャット本文の編集ごとにキーストロークが通知される
        // given (前提条件):
        let mut tracker = KeystrokeTracker::new();

        // when (操作):
        let first = tracker.observe("h");
        let second = tracker.observe("he");
        let unchanged = tracker.observe("he");

        // then (期待する結果):
        assert_eq!(first, Some(InputEvent::Keystroke));
        assert_eq!(second, Some(InputEvent::Keystroke));
        assert_eq!(unchanged, None);
    }

    #[test]
    fn test_clearing_chat_text_abandons_once() {
        // テスト項目: 入力中の本文を消すと Abandoned が1回だけ通知される
        // given (前提条件):
        let mut tracker = KeystrokeTracker::new();
        tracker.observe("hi");

        // when (操作):
        let cleared = tracker.observe("");
        let again = tracker.observe("");

        // then (期待する結果):
        assert_eq!(cleared, Some(InputEvent::Abandoned));
        assert_eq!(again, None);
    }

    #[test]
    fn test_command_lines_are_not_typing() {
        // テスト項目: コマンド行の入力は入力中として扱われず、本文からコマンドへの変化は Abandoned になる
        // given (前提条件):
        let mut tracker = KeystrokeTracker::new();

        // when (操作):
        let command = tracker.observe("/jo");
        tracker.observe("x");
        let turned_into_command = tracker.observe("/");

        // then (期待する結果):
        assert_eq!(command, None);
        assert_eq!(turned_into_command, Some(InputEvent::Abandoned));
    }

    #[test]
    fn test_reset_after_submit() {
        // テスト項目: 送信後のリセットで次の入力が新しいキーストロークになる
        // given (前提条件):
        let mut tracker = KeystrokeTracker::new();
        tracker.observe("hello");

        // when (操作):
        tracker.reset();

        // then (期待する結果):
        assert_eq!(tracker.observe(""), None);
        assert_eq!(tracker.observe("hello"), Some(InputEvent::Keystroke));
    }
}
