use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs},
    Frame,
};

use super::app::{App, InputField, InputMode, VIEWS};
use crate::commands::status_label;

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3), // Views
                Constraint::Min(0),    // Table
                Constraint::Length(1), // Message
                Constraint::Length(3), // Help
            ]
            .as_ref(),
        )
        .split(f.area());

    let titles: Vec<String> = VIEWS.iter().map(|v| v.title()).collect();
    let tabs = Tabs::new(titles)
        .select(app.view_index)
        .block(Block::default().borders(Borders::ALL).title("Notify"))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    let clock = *app.clock();
    let rows: Vec<Row> = app
        .tasks
        .iter()
        .map(|t| {
            let status = status_label(t, &clock);
            let style = match status {
                "Overdue" => Style::default().fg(Color::Red),
                "Ending soon" => Style::default().fg(Color::Yellow),
                "Started" => Style::default().fg(Color::Cyan),
                "Done" => Style::default().fg(Color::DarkGray),
                _ => Style::default().fg(Color::Green),
            };

            Row::new(vec![
                Cell::from(t.id.to_string()),
                Cell::from(t.name.clone()),
                Cell::from(t.category.clone()),
                Cell::from(t.task_type.to_string()),
                Cell::from(t.date_range.as_ref().map(|r| r.to_string()).unwrap_or_default()),
                Cell::from(status),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(32),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["ID", "Name", "Category", "Type", "Dates", "Status"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .bottom_margin(1),
        )
        .block(Block::default().borders(Borders::ALL).title(app.title()))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[1], &mut app.state);

    let message = Paragraph::new(app.message.clone().unwrap_or_default())
        .style(Style::default().fg(Color::Yellow));
    f.render_widget(message, chunks[2]);

    let help_text = match app.input_mode {
        InputMode::Normal => {
            "q: Quit | Tab: View | a: Add | n: Name | g: Category | s: Start | t: Due | f: Floating | Space: Done | d: Del | u: Undo | /: Search"
        }
        InputMode::Editing | InputMode::Searching => "Enter: Save | Esc: Cancel",
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[3]);

    // Render Input Box if needed
    if app.input_mode != InputMode::Normal {
        let area = centered_rect(60, 3, f.area()); // Fixed height of 3 (border + 1 line)
        f.render_widget(Clear, area); // Clear the area first

        let title = match app.input_mode {
            InputMode::Adding => match app.add_state.step {
                0 => "Add Task: Enter Name",
                1 => "Add Task: Enter Category (Optional)",
                2 => "Add Task: Enter Start Date (Optional, YYYY-MM-DD)",
                _ => "Add Task: Enter Due Date (Optional, YYYY-MM-DD)",
            },
            InputMode::Editing => match app.input_field {
                InputField::Name => "Edit Name",
                InputField::Category => "Edit Category",
                InputField::Start => "Edit Start Date (YYYY-MM-DD)",
                InputField::Due => "Edit Due Date (YYYY-MM-DD)",
                InputField::None => "Edit",
            },
            InputMode::Searching => "Search",
            InputMode::Normal => "",
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(margin),
                Constraint::Length(height),
                Constraint::Length(margin),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}
