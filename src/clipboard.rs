use arboard::Clipboard;
use thiserror::Error;

const MAX_CLIPBOARD_BYTES: usize = 1024 * 1024;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("nothing to copy")]
    Empty,
    #[error("text too large for clipboard ({0} bytes)")]
    TooLarge(usize),
    #[error("clipboard unavailable: {0}")]
    Unavailable(#[from] arboard::Error),
}

pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The system clipboard via arboard.
pub struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        Ok(Self {
            clipboard: Clipboard::new()?,
        })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.clipboard.set_text(text)?;
        Ok(())
    }
}

fn validate(text: &str) -> Result<(), ClipboardError> {
    if text.is_empty() {
        return Err(ClipboardError::Empty);
    }
    if text.len() > MAX_CLIPBOARD_BYTES {
        return Err(ClipboardError::TooLarge(text.len()));
    }
    Ok(())
}

pub fn copy_with(provider: &mut dyn ClipboardProvider, text: &str) -> Result<(), ClipboardError> {
    validate(text)?;
    provider.set_text(text)
}

/// Copies through the clipboard in `slot`, opening it on first use. The handle
/// stays open: some X11 setups drop the contents when it closes.
pub fn copy_cached(slot: &mut Option<SystemClipboard>, text: &str) -> Result<(), ClipboardError> {
    validate(text)?;
    let clipboard = match slot.take() {
        Some(clipboard) => clipboard,
        None => SystemClipboard::new()?,
    };
    copy_with(slot.insert(clipboard), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockClipboard {
        text: Option<String>,
    }

    impl ClipboardProvider for MockClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.text = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn copies_payload() {
        let mut clipboard = MockClipboard::default();
        copy_with(&mut clipboard, "WIFI:S:Home;T:none;;").expect("copy");
        assert_eq!(clipboard.text.as_deref(), Some("WIFI:S:Home;T:none;;"));
    }

    #[test]
    fn rejects_empty_and_oversized_text() {
        let mut clipboard = MockClipboard::default();
        assert!(matches!(copy_with(&mut clipboard, ""), Err(ClipboardError::Empty)));

        let huge = "x".repeat(MAX_CLIPBOARD_BYTES + 1);
        assert!(matches!(
            copy_with(&mut clipboard, &huge),
            Err(ClipboardError::TooLarge(_))
        ));
        assert!(clipboard.text.is_none());
    }
}
