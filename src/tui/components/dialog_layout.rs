use crate::tui::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Content area of a dialog plus the strip holding its key hints
pub struct DialogLayout {
    pub content_area: Rect,
    pub instructions_area: Rect,
}

/// Rectangle of `percent_w` x `percent_h` centered in `area`
pub fn centered_rect(percent_w: u16, percent_h: u16, area: Rect) -> Rect {
    let width = (area.width * percent_w) / 100;
    let height = (area.height * percent_h) / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Reserve enough rows at the bottom of `area` for the wrapped instructions
pub fn split_dialog_area(area: Rect, instructions: &str) -> DialogLayout {
    let wrap_width = area.width.saturating_sub(4).max(10) as usize;
    let wrapped_lines = textwrap::wrap(instructions, wrap_width);
    let instructions_height = ((wrapped_lines.len() as u16).max(1) + 2).min(area.height);
    DialogLayout {
        content_area: Rect {
            height: area.height.saturating_sub(instructions_height),
            ..area
        },
        instructions_area: Rect {
            y: area.y + area.height.saturating_sub(instructions_height),
            height: instructions_height,
            ..area
        },
    }
}

/// Clear the popup area and draw its frame and hints; returns the content area
pub fn render_dialog_frame(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    instructions: &str,
    theme: &Theme,
) -> Rect {
    frame.render_widget(Clear, area);
    let layout = split_dialog_area(area, instructions);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(theme.focused_border_style());
    let inner = block.inner(layout.content_area);
    frame.render_widget(block, layout.content_area);

    let hints = Paragraph::new(instructions)
        .wrap(Wrap { trim: true })
        .style(theme.muted_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style()),
        );
    frame.render_widget(hints, layout.instructions_area);
    inner
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        assert_eq!(centered_rect(50, 50, area), Rect::new(25, 12, 50, 25));
    }

    #[test]
    fn test_split_reserves_wrapped_instructions() {
        let area = Rect::new(0, 0, 24, 20);
        let layout = split_dialog_area(area, "Enter: apply  Esc: cancel  Del: remove");

        // 20 usable columns wrap the hints onto two lines plus borders
        assert_eq!(layout.instructions_area.height, 4);
        assert_eq!(layout.content_area.height, 16);
        assert_eq!(layout.instructions_area.y, 16);
    }
}
