use chrono::Utc;
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use std::path::PathBuf;
use std::sync::Arc;
use terramark::goals::{GoalKind, GoalStore};
use terramark::search::{self, CountryRow};
use terramark::stats::TravelStats;
use terramark::{widget, AppConfig, Atlas, AtlasHandle, CountryStatus, StatusStore};
use tracing::{debug, info, warn};

use crate::map_draw::{ColorScheme, MapView};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel { Left, Center, Right }

/// Co pokazuje lewa lista.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListMode {
    #[default]
    All,
    WantToVisit,
}

/// Dokąd idą wciśnięte znaki.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
    /// Wpisywany procent dla nowego celu.
    Percentage(String),
}

pub struct AppState {
    pub atlas: AtlasHandle,
    pub statuses: StatusStore,
    pub goals: GoalStore,
    pub stats: TravelStats,
    pub map: MapView,
    pub scheme: ColorScheme,
    pub query: String,
    pub mode: InputMode,
    pub list_mode: ListMode,
    pub list_items: Vec<CountryRow>,
    pub selected: usize,
    pub selected_goal: usize,
    pub selected_country: Option<String>,
    pub active_panel: Panel,
    pub message: Option<String>,
    widget_dir: PathBuf,
}

impl AppState {
    pub const HELP_TEXT: &'static str = "\
Klik / Enter: wybór kraju
v: odwiedzony   w: chcę odwiedzić   n: wyczyść
l: lista wszystkich / chcę odwiedzić
[ ]: przesuń kraj w kolejce chcę odwiedzić
g: cel +5 krajów   p: cel procentowy
s: cel z wybranego kraju   x: usuń cel
c: kolory   /: szukaj   Esc: koniec szukania
↑/↓: ruch w liście lub celach   Tab: panel   q: wyjście";

    pub fn new(config: &AppConfig) -> Self {
        let atlas = AtlasHandle::load_file(config.dataset_path(), config.projection);
        let statuses = StatusStore::open(&config.state_dir);
        let goals = GoalStore::open(&config.state_dir);
        Self::from_parts(atlas, statuses, goals, config.widget_dir.clone())
    }

    pub fn from_parts(atlas: AtlasHandle, statuses: StatusStore, goals: GoalStore, widget_dir: PathBuf) -> Self {
        let current = atlas.current();
        let stats = TravelStats::compute(current.directory(), &statuses);
        let mut state = Self {
            map: MapView::new(&current),
            atlas,
            statuses,
            goals,
            stats,
            scheme: ColorScheme::default(),
            query: String::new(),
            mode: InputMode::Normal,
            list_mode: ListMode::All,
            list_items: Vec::new(),
            selected: 0,
            selected_goal: 0,
            selected_country: None,
            active_panel: Panel::Left,
            message: None,
            widget_dir,
        };
        state.refresh_list();
        state.publish_widgets();
        state
    }

    pub fn current(&self) -> Arc<Atlas> {
        self.atlas.current()
    }

    /// Zwraca true, jeśli trzeba wyjść
    pub fn handle_input(&mut self, key: KeyCode) -> bool {
        use KeyCode::*;

        match self.mode {
            InputMode::Search => {
                self.handle_search_key(key);
                return false;
            }
            InputMode::Percentage(_) => {
                self.handle_percentage_key(key);
                return false;
            }
            InputMode::Normal => {}
        }

        match key {
            Char('q') => return true,
            Tab => {
                self.active_panel = match self.active_panel {
                    Panel::Left   => Panel::Center,
                    Panel::Center => Panel::Right,
                    Panel::Right  => Panel::Left,
                };
            }
            Up | Down if self.active_panel == Panel::Right => self.move_goal_cursor(key),
            Up | Down => self.move_cursor(key),
            Enter => {
                if let Some(row) = self.list_items.get(self.selected) {
                    self.selected_country = Some(row.id.clone());
                }
            }
            Char('/') => {
                self.mode = InputMode::Search;
                if self.list_mode != ListMode::All {
                    self.list_mode = ListMode::All;
                    self.refresh_list();
                }
            }
            Esc => self.selected_country = None,
            Char('v') => self.set_selected_status(CountryStatus::Visited),
            Char('w') => self.set_selected_status(CountryStatus::WantToVisit),
            Char('n') => self.set_selected_status(CountryStatus::None),
            Char('l') => self.toggle_list_mode(),
            Char('[') => self.move_wanted(true),
            Char(']') => self.move_wanted(false),
            Char('g') => self.add_next_goal(),
            Char('p') => self.mode = InputMode::Percentage(String::new()),
            Char('s') => self.add_specific_goal(),
            Char('x') | Delete => self.delete_selected_goal(),
            Char('c') => {
                self.scheme = self.scheme.toggled();
                self.atlas.touch();
            }
            _ => {}
        }
        false
    }

    fn handle_search_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.query.clear();
                self.refresh_list();
            }
            KeyCode::Enter => self.mode = InputMode::Normal,
            KeyCode::Backspace => {
                self.query.pop();
                self.refresh_list();
            }
            KeyCode::Char(c) => {
                self.query.push(c);
                self.refresh_list();
            }
            KeyCode::Up | KeyCode::Down => self.move_cursor(key),
            _ => {}
        }
    }

    fn handle_percentage_key(&mut self, key: KeyCode) {
        let InputMode::Percentage(buffer) = &mut self.mode else {
            return;
        };
        match key {
            KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Enter => {
                let text = std::mem::take(buffer);
                self.mode = InputMode::Normal;
                self.add_percentage_goal(&text);
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == ',' => buffer.push(c),
            _ => {}
        }
    }

    /// Lewy klik na mapie wybiera kraj pod kursorem.
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let Some(point) = self.map.cell_to_map(event.column, event.row) else {
            return;
        };
        self.active_panel = Panel::Center;
        let atlas = self.current();
        match atlas.hit_test(point) {
            Some(id) => {
                debug!(country = id, x = point.x, y = point.y, "trafiono kraj");
                self.select_country(id);
            }
            None => {
                debug!(x = point.x, y = point.y, "klik poza lądem");
                self.selected_country = None;
            }
        }
    }

    fn select_country(&mut self, id: &str) {
        self.selected_country = Some(id.to_string());
        if let Some(pos) = self.list_items.iter().position(|r| r.id == id) {
            self.selected = pos;
        }
    }

    fn move_cursor(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => if self.selected > 0 { self.selected -= 1 },
            KeyCode::Down => if self.selected + 1 < self.list_items.len() { self.selected += 1 },
            _ => {}
        }
    }

    fn move_goal_cursor(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => if self.selected_goal > 0 { self.selected_goal -= 1 },
            KeyCode::Down => if self.selected_goal + 1 < self.goals.goals().len() { self.selected_goal += 1 },
            _ => {}
        }
    }

    fn toggle_list_mode(&mut self) {
        self.list_mode = match self.list_mode {
            ListMode::All => ListMode::WantToVisit,
            ListMode::WantToVisit => ListMode::All,
        };
        self.selected = 0;
        self.refresh_list();
    }

    fn refresh_list(&mut self) {
        let atlas = self.current();
        let directory = atlas.directory();
        self.list_items = match self.list_mode {
            ListMode::All => search::flatten(&search::search(directory, &self.query)),
            ListMode::WantToVisit => self
                .statuses
                .want_to_visit_ids(directory)
                .into_iter()
                .map(|id| CountryRow {
                    name: directory.display_name(&id).to_string(),
                    id,
                })
                .collect(),
        };
        if self.selected >= self.list_items.len() {
            self.selected = self.list_items.len().saturating_sub(1);
        }
    }

    fn set_selected_status(&mut self, status: CountryStatus) {
        let Some(id) = self.selected_country.clone() else {
            self.message = Some("Najpierw wybierz kraj".to_string());
            return;
        };
        match self.statuses.update_status(status, &id) {
            Ok(()) => {
                info!(country = %id, status = ?status, "zmiana statusu");
                self.message = None;
            }
            Err(err) => {
                warn!(error = %err, "nie zapisano statusu");
                self.message = Some(err.to_string());
            }
        }
        self.after_data_change();
    }

    /// Przesuwa podświetlony kraj w kolejce „chcę odwiedzić”.
    fn move_wanted(&mut self, up: bool) {
        if self.list_mode != ListMode::WantToVisit {
            self.message = Some("Kolejność zmienisz w liście „chcę odwiedzić” (l)".to_string());
            return;
        }
        let Some(id) = self.list_items.get(self.selected).map(|r| r.id.clone()) else {
            return;
        };
        let atlas = self.current();
        match self.statuses.move_want_to_visit(atlas.directory(), &id, up) {
            Ok(true) => {
                debug!(country = %id, up, "nowa kolejność");
                if up {
                    self.selected -= 1;
                } else {
                    self.selected += 1;
                }
            }
            Ok(false) => {}
            Err(err) => {
                warn!(error = %err, "nie zapisano kolejności");
                self.message = Some(err.to_string());
            }
        }
        self.after_data_change();
    }

    fn add_next_goal(&mut self) {
        let total = u32::try_from(self.stats.total_countries).unwrap_or(u32::MAX).max(1);
        let visited = u32::try_from(self.stats.visited_count).unwrap_or(u32::MAX);
        self.add_goal(GoalKind::Countries(visited.saturating_add(5).min(total)));
    }

    fn add_percentage_goal(&mut self, text: &str) {
        match text.trim().replace(',', ".").parse::<f64>() {
            Ok(percentage) => self.add_goal(GoalKind::Percentage(percentage)),
            Err(_) => self.message = Some(format!("To nie jest liczba: {text}")),
        }
    }

    fn add_specific_goal(&mut self) {
        let Some(id) = self.selected_country.clone() else {
            self.message = Some("Najpierw wybierz kraj".to_string());
            return;
        };
        self.add_goal(GoalKind::SpecificCountries(vec![id]));
    }

    fn add_goal(&mut self, kind: GoalKind) {
        let label = kind.label();
        match self.goals.add(kind, None, None, Utc::now()) {
            Ok(id) => {
                info!(goal = id, %label, "dodano cel");
                self.message = None;
                if let Some(pos) = self.goals.goals().iter().position(|g| g.id == id) {
                    self.selected_goal = pos;
                }
            }
            Err(err) => {
                warn!(error = %err, "nie zapisano celu");
                self.message = Some(err.to_string());
            }
        }
        self.after_data_change();
    }

    fn delete_selected_goal(&mut self) {
        let Some(id) = self.goals.goals().get(self.selected_goal).map(|g| g.id) else {
            self.message = Some("Brak celów".to_string());
            return;
        };
        match self.goals.remove(id) {
            Ok(goal) => {
                info!(goal = goal.id, "usunięto cel");
                self.message = None;
            }
            Err(err) => {
                warn!(error = %err, "nie usunięto celu");
                self.message = Some(err.to_string());
            }
        }
        self.selected_goal = self.selected_goal.min(self.goals.goals().len().saturating_sub(1));
        self.after_data_change();
    }

    fn after_data_change(&mut self) {
        let atlas = self.current();
        self.stats = TravelStats::compute(atlas.directory(), &self.statuses);
        self.refresh_list();
        self.publish_widgets();
    }

    fn publish_widgets(&mut self) {
        if let Err(err) = widget::publish(&self.widget_dir, &self.stats, &self.statuses, &self.goals) {
            warn!(error = %err, "nie zapisano migawek widżetów");
            self.message = Some(err.to_string());
        }
    }
}
