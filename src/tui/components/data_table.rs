use crate::core::PageView;
use crate::tui::{Action, Component, Focusable, Theme};
use color_eyre::Result;
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

const MAX_COLUMN_WIDTH: usize = 40;
const MIN_COLUMN_WIDTH: usize = 4;

/// Owned, display-ready copy of the rows on the current page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSnapshot {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// 1-based number of the first row, for the title counter
    pub first_row_number: usize,
}

impl TableSnapshot {
    pub fn from_page(page: &PageView<'_>, columns: &[String]) -> Self {
        let rows = page
            .rows
            .iter()
            .map(|row| columns.iter().map(|c| sanitize_cell(&row.display(c))).collect())
            .collect();
        Self {
            columns: columns.to_vec(),
            rows,
            first_row_number: page.range.start + 1,
        }
    }

    /// Display width per column: widest of header and cells, clamped
    fn column_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let widest_cell = self
                    .rows
                    .iter()
                    .filter_map(|r| r.get(idx))
                    .map(|s| s.chars().count())
                    .max()
                    .unwrap_or(0);
                widest_cell
                    .max(name.chars().count())
                    .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
            })
            .collect()
    }
}

/// Remote text may carry escape sequences and line breaks; neither belongs in a cell
pub fn sanitize_cell(raw: &str) -> String {
    let flattened: String = raw
        .chars()
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .collect();
    strip_ansi_escapes::strip_str(flattened)
        .chars()
        .filter(|c| !c.is_control())
        .collect()
}

/// Paged table of the filtered rows
///
/// The cursor moves within the current page; left/right scroll the visible
/// column window.
pub struct DataTable {
    snapshot: TableSnapshot,
    title: String,
    cursor: usize,
    column_offset: usize,
    loading: bool,
    focused: bool,
    supported_actions: Vec<Action>,
}

impl Default for DataTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DataTable {
    pub fn new() -> Self {
        Self {
            snapshot: TableSnapshot::default(),
            title: String::new(),
            cursor: 0,
            column_offset: 0,
            loading: false,
            focused: true,
            supported_actions: vec![
                Action::MoveUp,
                Action::MoveDown,
                Action::MoveLeft,
                Action::MoveRight,
                Action::GoToTop,
                Action::GoToBottom,
            ],
        }
    }

    /// Replace the rows shown; cursor and scroll are kept in bounds
    pub fn set_snapshot(&mut self, snapshot: TableSnapshot) {
        self.snapshot = snapshot;
        self.cursor = self.cursor.min(self.snapshot.rows.len().saturating_sub(1));
        self.column_offset = self
            .column_offset
            .min(self.snapshot.columns.len().saturating_sub(1));
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Back to the first row and column, e.g. after a page or tab change
    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
        self.column_offset = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn column_offset(&self) -> usize {
        self.column_offset
    }

    pub fn snapshot(&self) -> &TableSnapshot {
        &self.snapshot
    }

    fn move_down(&mut self) {
        if self.cursor + 1 < self.snapshot.rows.len() {
            self.cursor += 1;
        }
    }

    fn move_right(&mut self) {
        if self.column_offset + 1 < self.snapshot.columns.len() {
            self.column_offset += 1;
        }
    }

    fn empty_message(&self) -> &'static str {
        if self.loading {
            "Loading data..."
        } else if self.snapshot.columns.is_empty() {
            "No data available"
        } else {
            "No rows match the current search and filters"
        }
    }
}

impl Component for DataTable {
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::MoveUp => self.cursor = self.cursor.saturating_sub(1),
            Action::MoveDown => self.move_down(),
            Action::MoveLeft => self.column_offset = self.column_offset.saturating_sub(1),
            Action::MoveRight => self.move_right(),
            Action::GoToTop => self.cursor = 0,
            Action::GoToBottom => self.cursor = self.snapshot.rows.len().saturating_sub(1),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let row_count = self.snapshot.rows.len();
        let title = if row_count > 0 {
            format!(
                " {} [{}/{}] ",
                self.title,
                self.snapshot.first_row_number + self.cursor,
                self.snapshot.first_row_number + row_count - 1
            )
        } else {
            format!(" {} ", self.title)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(if self.focused {
                theme.focused_border_style()
            } else {
                theme.border_style()
            });

        if row_count == 0 {
            let message = Paragraph::new(Line::from(self.empty_message()))
                .style(theme.muted_style())
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        // Fit as many columns from the offset as the inner width allows
        let widths = self.snapshot.column_widths();
        let available = area.width.saturating_sub(2) as usize;
        let mut used = 0usize;
        let mut shown = Vec::new();
        for (idx, width) in widths.iter().enumerate().skip(self.column_offset) {
            let needed = width + if shown.is_empty() { 0 } else { 1 };
            if !shown.is_empty() && used + needed > available {
                break;
            }
            used += needed;
            shown.push(idx);
        }

        let header = Row::new(
            shown
                .iter()
                .map(|&i| Cell::from(self.snapshot.columns[i].as_str())),
        )
        .style(theme.header_style());

        let rows: Vec<Row> = self
            .snapshot
            .rows
            .iter()
            .enumerate()
            .map(|(row_idx, cells)| {
                let style = if row_idx == self.cursor {
                    theme.selected_style()
                } else if row_idx % 2 == 1 {
                    theme.alt_row_style()
                } else {
                    theme.normal_style()
                };
                Row::new(
                    shown
                        .iter()
                        .map(|&i| Cell::from(cells.get(i).map(String::as_str).unwrap_or(""))),
                )
                .style(style)
            })
            .collect();

        let constraints: Vec<Constraint> = shown
            .iter()
            .map(|&i| Constraint::Length(widths[i] as u16))
            .collect();

        let table = Table::new(rows, constraints).header(header).block(block);
        frame.render_widget(table, area);
    }

    fn supported_actions(&self) -> &[Action] {
        &self.supported_actions
    }

    fn name(&self) -> &str {
        "DataTable"
    }
}

impl Focusable for DataTable {
    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Pagination, Row as DataRow};
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    fn snapshot(rows: usize) -> TableSnapshot {
        TableSnapshot {
            columns: vec!["publisher".into(), "cpm".into(), "region".into()],
            rows: (0..rows)
                .map(|i| vec![format!("pub-{}", i), format!("{}", i * 10), "EMEA".into()])
                .collect(),
            first_row_number: 1,
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_cursor_movement() {
        let mut table = DataTable::new();
        table.set_snapshot(snapshot(3));

        table.handle_action(Action::MoveDown).unwrap();
        assert_eq!(table.cursor(), 1);
        table.handle_action(Action::GoToBottom).unwrap();
        assert_eq!(table.cursor(), 2);
        table.handle_action(Action::MoveDown).unwrap();
        assert_eq!(table.cursor(), 2);
        table.handle_action(Action::GoToTop).unwrap();
        table.handle_action(Action::MoveUp).unwrap();
        assert_eq!(table.cursor(), 0);
    }

    #[test]
    fn test_horizontal_scroll_is_bounded() {
        let mut table = DataTable::new();
        table.set_snapshot(snapshot(1));

        for _ in 0..5 {
            table.handle_action(Action::MoveRight).unwrap();
        }
        assert_eq!(table.column_offset(), 2);
        table.handle_action(Action::MoveLeft).unwrap();
        assert_eq!(table.column_offset(), 1);
    }

    #[test]
    fn test_smaller_snapshot_clamps_cursor() {
        let mut table = DataTable::new();
        table.set_snapshot(snapshot(5));
        table.handle_action(Action::GoToBottom).unwrap();

        table.set_snapshot(snapshot(2));
        assert_eq!(table.cursor(), 1);

        table.set_snapshot(TableSnapshot::default());
        assert_eq!(table.cursor(), 0);
    }

    #[test]
    fn test_unhandled_action_propagates() {
        let mut table = DataTable::new();
        assert!(!table.handle_action(Action::Quit).unwrap());
    }

    #[test]
    fn test_snapshot_from_page_uses_visible_columns() {
        let rows = vec![
            DataRow::from_pairs([("a", "1"), ("b", "x\u{1b}[31mred\u{1b}[0m")]),
            DataRow::from_pairs([("a", "2"), ("b", "line\nbreak")]),
        ];
        let refs: Vec<&DataRow> = rows.iter().collect();
        let pagination = Pagination::new(25);
        let page = PageView {
            rows: refs,
            range: pagination.range(2),
            total: 2,
            page: 0,
            page_count: 1,
        };

        let snap = TableSnapshot::from_page(&page, &["b".to_string()]);

        assert_eq!(snap.columns, vec!["b".to_string()]);
        assert_eq!(snap.rows, vec![vec!["xred".to_string()], vec!["line break".to_string()]]);
        assert_eq!(snap.first_row_number, 1);
    }

    #[test]
    fn test_render_shows_header_and_counter() {
        let mut table = DataTable::new();
        table.set_title("GLOBAL");
        table.set_snapshot(snapshot(3));
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();

        terminal
            .draw(|f| table.render(f, f.area(), &Theme::default()))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("publisher"));
        assert!(text.contains("GLOBAL [1/3]"));
        assert!(text.contains("pub-2"));
    }

    #[test]
    fn test_render_empty_states() {
        let mut table = DataTable::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 5)).unwrap();

        table.set_loading(true);
        terminal
            .draw(|f| table.render(f, f.area(), &Theme::default()))
            .unwrap();
        assert!(buffer_text(&terminal).contains("Loading data..."));

        table.set_loading(false);
        terminal
            .draw(|f| table.render(f, f.area(), &Theme::default()))
            .unwrap();
        assert!(buffer_text(&terminal).contains("No data available"));
    }
}
