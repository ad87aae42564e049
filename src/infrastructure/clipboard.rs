use arboard::Clipboard;
use std::cell::RefCell;

thread_local! {
    // On X11 and Wayland the copied text is served by this handle, so it
    // lives as long as the UI thread instead of being dropped after a copy.
    static CLIPBOARD: RefCell<Option<Clipboard>> = const { RefCell::new(None) };
}

pub struct ClipboardExporter;

impl ClipboardExporter {
    /// Puts `text` on the system clipboard.
    ///
    /// The clipboard handle is opened on first use and reused afterwards.
    /// A handle that fails to take the text is dropped, so the next copy
    /// opens a fresh one.
    pub fn copy(text: &str) -> Result<(), String> {
        CLIPBOARD.with(|cell| {
            let mut slot = cell.borrow_mut();
            let mut clipboard = match slot.take() {
                Some(clipboard) => clipboard,
                None => Clipboard::new().map_err(|e| e.to_string())?,
            };
            clipboard
                .set_text(text.to_owned())
                .map_err(|e| e.to_string())?;
            *slot = Some(clipboard);
            Ok(())
        })
    }
}
