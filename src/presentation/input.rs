use crate::application::{App, AppMode};
use crate::infrastructure::{ClipboardService, CsvExporter};
use crossterm::event::{KeyCode, KeyModifiers};
use std::path::Path;

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::ExportCsv => Self::handle_text_entry(app, key, modifiers, Self::export_csv),
            AppMode::EditStartDate
            | AppMode::EditEndDate
            | AppMode::EditExcludedDates
            | AppMode::EditLeadCount => {
                Self::handle_text_entry(app, key, modifiers, App::finish_editing)
            }
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if key == KeyCode::Char('e') {
                app.start_csv_export();
            }
            return;
        }

        app.status_message = None;

        match key {
            KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Home | KeyCode::Char('g') => app.select_first(),
            KeyCode::End | KeyCode::Char('G') => app.select_last(),
            KeyCode::Char('a') => {
                app.add_row();
            }
            KeyCode::Char('s') => app.start_editing(AppMode::EditStartDate),
            KeyCode::Char('e') => app.start_editing(AppMode::EditEndDate),
            KeyCode::Char('x') => app.start_editing(AppMode::EditExcludedDates),
            KeyCode::Char('l') => app.start_editing(AppMode::EditLeadCount),
            KeyCode::Enter => {
                if let Some(id) = app.selected_row_id() {
                    app.save_row(id);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = app.selected_row_id() {
                    app.delete_row(id);
                }
            }
            KeyCode::Char('y') => {
                if let Some(id) = app.selected_row_id() {
                    if let Some(summary) = app.row_summary(id) {
                        let result = ClipboardService::copy_text(&summary);
                        app.set_clipboard_result(id, result);
                    }
                }
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_text_entry(
        app: &mut App,
        key: KeyCode,
        modifiers: KeyModifiers,
        on_enter: fn(&mut App),
    ) {
        match key {
            KeyCode::Enter => on_enter(app),
            KeyCode::Esc => app.cancel_editing(),
            KeyCode::Backspace => app.delete_char_before_cursor(),
            KeyCode::Delete => app.delete_char_at_cursor(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            KeyCode::Home => app.move_cursor_home(),
            KeyCode::End => app.move_cursor_end(),
            // Ctrl chords are shortcuts, not text
            KeyCode::Char(_) if modifiers.contains(KeyModifiers::CONTROL) => {}
            KeyCode::Char(c) => app.insert_char(c),
            _ => {}
        }
    }

    fn export_csv(app: &mut App) {
        let filename = app.get_csv_export_filename();
        let rows = app.rows();
        let result = CsvExporter::export_rows(&rows, &app.config, Path::new(&filename));
        app.set_csv_export_result(&filename, result);
    }
}
