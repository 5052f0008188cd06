use crate::domain::{AppError, AppResult};
use arboard::Clipboard;

pub struct ClipboardService;

impl ClipboardService {
    pub fn copy_text(text: &str) -> AppResult<()> {
        let mut clipboard = Clipboard::new().map_err(|e| AppError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| AppError::Clipboard(e.to_string()))
    }
}
