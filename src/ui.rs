use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use terramark::CountryDirectory;

use crate::state::{AppState, InputMode, ListMode, Panel};

fn border_style(state: &AppState, panel: Panel) -> Style {
    if state.active_panel == panel {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(f.area());

    let atlas = state.current();
    let directory = atlas.directory();

    // Lewy panel: lista krajów (wyniki wyszukiwania)
    let items: Vec<ListItem> = state.list_items
        .iter()
        .map(|row| {
            let flag = directory.flag_emoji(&row.id);
            let color = state.scheme.stroke(state.statuses.status(&row.id));
            ListItem::new(format!("{flag} {}", row.name)).style(Style::default().fg(color))
        })
        .collect();
    let mut list_state = ListState::default();
    if !state.list_items.is_empty() {
        list_state.select(Some(state.selected));
    }
    let title = match state.list_mode {
        ListMode::WantToVisit => format!("Chcę odwiedzić ({})", state.list_items.len()),
        ListMode::All if state.mode == InputMode::Search || !state.query.is_empty() => {
            format!("Szukaj: {}", state.query)
        }
        ListMode::All => format!("Kraje ({})", state.list_items.len()),
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title).border_style(border_style(state, Panel::Left)))
        .highlight_symbol(">> ")
        .highlight_style(Style::default().fg(Color::Red));
    f.render_stateful_widget(list, chunks[0], &mut list_state);

    // Środek: mapa
    let map_title = match &state.selected_country {
        Some(id) => format!("Mapa – {}", directory.display_name(id)),
        None => format!("Mapa – {} krajów", directory.len()),
    };
    state.map.render(
        f,
        chunks[1],
        &map_title,
        &atlas,
        &state.statuses,
        state.scheme,
        state.selected_country.as_deref(),
    );

    // Prawy panel: kraj + statystyki + cele
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Percentage(30),
        ])
        .split(chunks[2]);

    let info_text = country_info(state, directory);
    let info_paragraph = Paragraph::new(info_text)
        .block(Block::default().borders(Borders::ALL).title("Informacje").border_style(border_style(state, Panel::Right)))
        .wrap(Wrap { trim: true });
    f.render_widget(info_paragraph, right_chunks[0]);

    // Statystyki
    let stats = &state.stats;
    let mut stats_text = format!(
        "Odwiedzone: {}/{} ({:.1}%)\nChcę odwiedzić: {}\n",
        stats.visited_count,
        stats.total_countries,
        stats.visited_percentage() * 100.0,
        stats.want_to_visit_count,
    );
    for c in &stats.continents {
        stats_text.push_str(&format!("{}: {:.0}%\n", c.name, c.percentage() * 100.0));
    }
    let stats_paragraph = Paragraph::new(stats_text)
        .block(Block::default().borders(Borders::ALL).title("Statystyki"))
        .wrap(Wrap { trim: true });
    f.render_widget(stats_paragraph, right_chunks[1]);

    // Cele
    let goals_text = if state.goals.goals().is_empty() {
        "Brak celów, naciśnij g".to_string()
    } else {
        state.goals.goals()
            .iter()
            .enumerate()
            .map(|(i, g)| {
                let p = g.progress(&state.stats, &state.statuses);
                let cursor = if i == state.selected_goal && state.active_panel == Panel::Right { ">" } else { " " };
                let mark = if p.is_complete { "✓" } else { "·" };
                let label = g.title.clone().unwrap_or_else(|| g.kind.label());
                format!("{cursor}{mark} {label} {}", p.description)
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    let goals_paragraph = Paragraph::new(goals_text)
        .block(Block::default().borders(Borders::ALL).title("Cele").border_style(border_style(state, Panel::Right)))
        .wrap(Wrap { trim: true });
    f.render_widget(goals_paragraph, right_chunks[2]);
}

fn country_info(state: &AppState, directory: &CountryDirectory) -> String {
    let mut text = match &state.selected_country {
        Some(id) => format!(
            "{} {}\nKod: {}\nKontynent: {}\nStatus: {}",
            directory.flag_emoji(id),
            directory.display_name(id),
            id,
            directory.continent(id).unwrap_or("—"),
            state.statuses.status(id).title(),
        ),
        None => AppState::HELP_TEXT.to_string(),
    };
    if let InputMode::Percentage(buffer) = &state.mode {
        text.push_str(&format!("\n\nCel procentowy: {buffer}%  (Enter / Esc)"));
    }
    if let Some(msg) = &state.message {
        text.push_str("\n\n");
        text.push_str(msg);
    }
    text
}
