use crate::application::{App, AppMode};
use crate::domain::RowView;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

const COLUMN_HEADERS: [&str; 9] = [
    "ID",
    "Start Date",
    "End Date",
    "Months",
    "Dates Excluded",
    "Days",
    "Lead Count",
    "Expected DRR",
    "Last Updated",
];

pub fn render_ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    // Borders and the header line take three rows
    app.update_viewport_size(chunks[1].height.saturating_sub(3) as usize);

    render_header(f, app, chunks[0]);
    render_table(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let rows = app.rows();
    let saved = rows.iter().filter(|row| row.is_saved).count();
    let header = Paragraph::new(format!(
        "tdrr - Daily Run Rate | Rows: {} ({} saved)",
        rows.len(),
        saved
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn row_cells(app: &App, view: &RowView) -> Vec<String> {
    let placeholder = |text: String, hint: &str| {
        if text.is_empty() && !view.is_saved {
            hint.to_string()
        } else {
            text
        }
    };

    vec![
        view.id.to_string(),
        placeholder(app.display_date(view.start_date), "<start>"),
        placeholder(app.display_date(view.end_date), "<end>"),
        view.months.to_string(),
        view.excluded_dates.clone(),
        view.days.to_string(),
        view.lead_count.to_string(),
        app.display_drr(view.expected_drr),
        if view.is_saved {
            let stamp = app.display_timestamp(view.last_updated);
            if stamp.is_empty() { "N/A".to_string() } else { stamp }
        } else {
            "Enter: save | d: delete".to_string()
        },
    ]
}

fn render_table(f: &mut Frame, app: &App, area: Rect) {
    let header_cells = COLUMN_HEADERS
        .iter()
        .map(|title| Cell::from(*title).style(Style::default().fg(Color::Yellow)));
    let header_row = Row::new(header_cells).height(1);

    let views = app.rows();
    let mut widths: Vec<usize> = COLUMN_HEADERS.iter().map(|title| title.len()).collect();
    let mut body = Vec::new();

    for (index, view) in views
        .iter()
        .enumerate()
        .skip(app.scroll_row)
        .take(app.viewport_rows)
    {
        let cells = row_cells(app, view);
        for (width, text) in widths.iter_mut().zip(&cells) {
            *width = (*width).max(text.chars().count()).min(40);
        }

        let style = if index == app.selected_row {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else if view.is_saved {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        body.push(Row::new(cells.into_iter().map(Cell::from)).style(style).height(1));
    }

    let constraints: Vec<Constraint> = widths
        .into_iter()
        .map(|width| Constraint::Length(width as u16))
        .collect();

    let table = Table::new(body, constraints)
        .header(header_row)
        .block(Block::default().borders(Borders::ALL).title("Daily Run Rate"))
        .column_spacing(1);

    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let buffer = app.buffer();
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                format!(
                    "Range: {} .. {} | a: add | s/e: dates | x: excluded | l: leads | Enter: save | ?: help | q: quit",
                    app.display_date(buffer.start_date),
                    app.display_date(buffer.end_date)
                )
            }
        }
        AppMode::EditStartDate => format!("Start date (YYYY-MM-DD): {}", app.input),
        AppMode::EditEndDate => format!("End date (YYYY-MM-DD): {}", app.input),
        AppMode::EditExcludedDates => format!("Excluded dates (comma separated): {}", app.input),
        AppMode::EditLeadCount => format!("Lead count: {}", app.input),
        AppMode::ExportCsv => format!("Export CSV as: {} (Enter to export, Esc to cancel)", app.input),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::ExportCsv => Style::default().fg(Color::Magenta),
            _ => Style::default().fg(Color::Green),
        });
    f.render_widget(input, area);

    if app.mode.is_text_entry() {
        let prefix = match app.mode {
            AppMode::EditStartDate => "Start date (YYYY-MM-DD): ",
            AppMode::EditEndDate => "End date (YYYY-MM-DD): ",
            AppMode::EditExcludedDates => "Excluded dates (comma separated): ",
            AppMode::EditLeadCount => "Lead count: ",
            _ => "Export CSV as: ",
        };
        let offset = prefix.chars().count() + app.input[..app.cursor_position].chars().count();
        let x = area.x + 1 + offset as u16;
        f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("tdrr Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"TDRR - DAILY RUN RATE

=== ROWS ===
Each row records a date range, the dates to leave out of it and a lead
count. Saving a row computes and freezes:
  Months        calendar months from start to end (day of month ignored)
  Days          days from start to end inclusive, minus excluded dates
                that fall inside the range
  Expected DRR  lead count / days (0 when days is 0)

=== SHARED DATE RANGE ===
Start and end dates are shared by every unsaved row. Whatever range is
entered when a row is saved is the range that row keeps.
An end date earlier than the start date is ignored.

=== KEYS ===
a               Add a row
j / Down        Next row
k / Up          Previous row
g / Home        First row
G / End         Last row
s               Edit start date
e               Edit end date
x               Edit excluded dates of the selected row
l               Edit lead count of the selected row
Enter           Save the selected row
d / Delete      Delete the selected row (unsaved rows only)
y               Copy the selected row to the clipboard
Ctrl+E          Export all rows to CSV
? / F1          Toggle this help
q               Quit

=== TEXT ENTRY ===
Enter           Apply
Esc             Cancel
Left / Right    Move cursor
Home / End      Jump to start / end
Backspace/Del   Delete characters

Dates are typed as YYYY-MM-DD. An empty date clears it.
Excluded dates are comma separated, e.g. 2024-02-10, 2024-02-11.
Entries that are not dates are kept but never excluded.
A lead count that does not start with a number shows as NaN and makes
the expected DRR NaN.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};

    fn render_to_string(app: &mut App) -> String {
        let backend = TestBackend::new(140, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render_ui(f, app)).unwrap();

        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_render_shows_headers_and_placeholders() {
        let mut app = App::default();
        let screen = render_to_string(&mut app);

        assert!(screen.contains("Expected DRR"));
        assert!(screen.contains("<start>"));
        assert!(screen.contains("Rows: 1 (0 saved)"));
    }

    #[test]
    fn test_render_saved_row() {
        let mut app = App::default();
        app.set_start_date(NaiveDate::from_ymd_opt(2024, 1, 1));
        app.set_end_date(NaiveDate::from_ymd_opt(2024, 1, 10));
        app.set_lead_count(1, "25");
        app.save_row(1);

        let screen = render_to_string(&mut app);
        assert!(screen.contains("2024-01-10"));
        assert!(screen.contains("2.5"));
        assert!(screen.contains("Rows: 1 (1 saved)"));
    }

    #[test]
    fn test_render_updates_viewport() {
        let mut app = App::default();
        render_to_string(&mut app);
        // 20 lines minus header, status bar, borders and column titles
        assert_eq!(app.viewport_rows, 13);
    }

    #[test]
    fn test_render_survives_unrenderable_formats() {
        let mut app = App::new(crate::infrastructure::Config {
            date_format: "%H:%M".to_string(),
            timestamp_format: "%Y-%Q".to_string(),
            drr_precision: 70000,
            ..Default::default()
        });
        app.set_start_date(NaiveDate::from_ymd_opt(2024, 1, 1));
        app.set_end_date(NaiveDate::from_ymd_opt(2024, 1, 10));
        app.save_row(1);

        let screen = render_to_string(&mut app);
        assert!(screen.contains("N/A"));
    }

    #[test]
    fn test_render_help_popup() {
        let mut app = App::default();
        app.mode = AppMode::Help;
        let screen = render_to_string(&mut app);
        assert!(screen.contains("tdrr Help"));
    }
}
