use crate::detail::DetailPhase;
use crate::list::LoadPhase;
use crate::tui::state::{AppState, Screen};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

pub fn draw(f: &mut Frame, state: &mut AppState) {
    match state.screen {
        Screen::List => draw_list(f, state),
        Screen::Detail => draw_detail(f, state),
    }
}

fn draw_list(f: &mut Frame, state: &mut AppState) {
    // First load and fatal-error states take over the whole screen, like
    // the detail placeholders.
    if state.list.items.is_empty() {
        match &state.list.phase {
            LoadPhase::InitialLoading => {
                centered_message(f, "Loading profiles...", Color::Cyan);
                return;
            }
            LoadPhase::Error(msg) => {
                centered_message(
                    f,
                    &format!("Error: {}\n\nPress 'r' to retry.", msg),
                    Color::Red,
                );
                return;
            }
            LoadPhase::Idle => {
                centered_message(f, "No profiles found.\n\nPress 'r' to retry.", Color::Gray);
                return;
            }
            _ => {}
        }
    }

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let rows: Vec<ListItem> = state
        .list
        .items
        .iter()
        .map(|p| {
            let email = p.email.as_deref().unwrap_or("No email");
            ListItem::new(Line::from(vec![
                Span::styled(
                    p.display_name().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {}", email), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let title = match state.list.phase {
        LoadPhase::Refreshing => " Profiles (Refreshing...) ".to_string(),
        LoadPhase::Paginating => " Profiles (Loading more...) ".to_string(),
        _ => format!(" Profiles ({}) ", state.list.items.len()),
    };

    let list = List::new(rows)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::Blue),
        );
    f.render_stateful_widget(list, v_chunks[0], &mut state.list_state);

    // --- Footer ---
    let f_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(v_chunks[1]);

    let (status, status_color) = match &state.list.phase {
        LoadPhase::InitialLoading => ("Loading profiles...".to_string(), Color::Cyan),
        LoadPhase::Refreshing => ("Refreshing...".to_string(), Color::Cyan),
        LoadPhase::Paginating => ("Loading more...".to_string(), Color::Cyan),
        // A failed append keeps the list on screen; the error only shows here.
        LoadPhase::Error(msg) => (format!("Error: {}", msg), Color::Red),
        LoadPhase::Idle if state.list.has_more => ("Ready.".to_string(), Color::Cyan),
        LoadPhase::Idle => ("Ready. (end of list)".to_string(), Color::Cyan),
    };
    let status = Paragraph::new(status)
        .style(Style::default().fg(status_color))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                .title(" Status "),
        );

    let help = Paragraph::new("Enter:Open | j/k:Move | r:Refresh | q:Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                .title(" Actions "),
        );
    f.render_widget(status, f_chunks[0]);
    f.render_widget(help, f_chunks[1]);
}

fn draw_detail(f: &mut Frame, state: &mut AppState) {
    let Some(detail) = &state.detail else {
        centered_message(f, "Missing profile id.", Color::Red);
        return;
    };

    match &detail.phase {
        DetailPhase::MissingId => {
            centered_message(f, "Missing profile id.\n\nPress Esc to go back.", Color::Red);
        }
        DetailPhase::Loading => {
            centered_message(f, "Loading profile...", Color::Cyan);
        }
        DetailPhase::NotFound => {
            centered_message(f, "Profile not found.\n\nPress Esc to go back.", Color::Gray);
        }
        DetailPhase::Error(msg) => {
            centered_message(
                f,
                &format!("Error: {}\n\nPress 'r' to retry, Esc to go back.", msg),
                Color::Red,
            );
        }
        DetailPhase::Loaded(profile) => {
            let v_chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(3)])
                .split(f.area());

            let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
            let mut lines = vec![
                Line::from(Span::styled(
                    profile.display_name().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("Email:   {}", dash(&profile.email))),
                Line::from(format!("Phone:   {}", dash(&profile.phone))),
                Line::from(format!("City:    {}", dash(&profile.city))),
                Line::from(format!("Company: {}", dash(&profile.company))),
                Line::from(""),
                Line::from(Span::styled(
                    "About",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
            ];
            lines.push(Line::from(
                profile.bio.clone().unwrap_or_else(|| "No bio.".to_string()),
            ));

            let card = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Profile "),
            );
            f.render_widget(card, v_chunks[0]);

            let help = Paragraph::new("Esc:Back | q:Quit")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Right)
                .block(Block::default().borders(Borders::ALL).title(" Actions "));
            f.render_widget(help, v_chunks[1]);
        }
    }
}

fn centered_message(f: &mut Frame, text: &str, color: Color) {
    let area = centered_rect(60, 30, f.area());
    let msg = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(msg, area);
}

/// Helper function to create a centered rect using up certain percentages of the available rect.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
