use geo::Coord;
use ratatui::layout::Rect as TuiRect;
use ratatui::style::Color;
use ratatui::widgets::canvas::{Canvas, Line};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;
use terramark::{Atlas, CountryStatus, StatusStore};

/// Paleta obrysów; `c` przełącza między jasną a ciemną.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorScheme {
    #[default]
    Dark,
    Light,
}

impl ColorScheme {
    pub fn toggled(self) -> Self {
        match self {
            ColorScheme::Dark => ColorScheme::Light,
            ColorScheme::Light => ColorScheme::Dark,
        }
    }

    pub fn stroke(self, status: CountryStatus) -> Color {
        match (self, status) {
            (ColorScheme::Dark, CountryStatus::None) => Color::DarkGray,
            (ColorScheme::Light, CountryStatus::None) => Color::Gray,
            (ColorScheme::Dark, CountryStatus::Visited) => Color::LightBlue,
            (ColorScheme::Light, CountryStatus::Visited) => Color::Blue,
            (ColorScheme::Dark, CountryStatus::WantToVisit) => Color::Yellow,
            (ColorScheme::Light, CountryStatus::WantToVisit) => Color::LightYellow,
        }
    }
}

/// Zakresy płótna i przeliczanie kliknięć na współrzędne mapy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapView {
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Wnętrze ramki z ostatniego rysowania.
    pub inner: TuiRect,
    /// Rewizja atlasu, z której policzono zakresy.
    pub revision: u64,
}

impl MapView {
    pub fn new(atlas: &Atlas) -> Self {
        let (x_bounds, y_bounds) = match atlas.bounds() {
            Some(b) => ([b.min().x, b.max().x], [b.min().y, b.max().y]),
            None => ([-1.0, 1.0], [-1.0, 1.0]),
        };
        Self {
            x_bounds,
            y_bounds,
            inner: TuiRect::default(),
            revision: atlas.revision(),
        }
    }

    /// Nowa migawka atlasu: przelicz zakresy, zachowaj ostatnią ramkę.
    pub fn sync(&mut self, atlas: &Atlas) {
        if self.revision != atlas.revision() {
            *self = Self { inner: self.inner, ..Self::new(atlas) };
        }
    }

    /// Komórka terminala → punkt na mapie (środek komórki). Poza płótnem: `None`.
    pub fn cell_to_map(&self, column: u16, row: u16) -> Option<Coord<f64>> {
        let r = self.inner;
        if r.width == 0 || r.height == 0 {
            return None;
        }
        if column < r.x || column >= r.x + r.width || row < r.y || row >= r.y + r.height {
            return None;
        }
        let fx = (f64::from(column - r.x) + 0.5) / f64::from(r.width);
        let fy = (f64::from(row - r.y) + 0.5) / f64::from(r.height);
        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        // Oś y płótna rośnie do góry, wiersze terminala w dół.
        Some(Coord {
            x: x0 + fx * (x1 - x0),
            y: y1 - fy * (y1 - y0),
        })
    }

    /// Rysuje wszystkie obrysy w kolorze statusu, a na końcu wybrany kraj na czerwono.
    pub fn render(
        &mut self,
        f: &mut Frame,
        area: TuiRect,
        title: &str,
        atlas: &Atlas,
        statuses: &StatusStore,
        scheme: ColorScheme,
        highlight: Option<&str>,
    ) {
        self.sync(atlas);
        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        self.inner = block.inner(area);

        let canvas = Canvas::default()
            .block(block)
            .x_bounds(self.x_bounds)
            .y_bounds(self.y_bounds)
            .paint(|ctx| {
                for record in atlas.records() {
                    let color = scheme.stroke(statuses.status(&record.country_id));
                    draw_rings(ctx, record, color);
                }
                ctx.layer();
                if let Some(sel) = highlight {
                    for record in atlas.records().iter().filter(|r| r.country_id == sel) {
                        draw_rings(ctx, record, Color::Red);
                    }
                }
            });
        f.render_widget(canvas, area);
    }
}

fn draw_rings(ctx: &mut ratatui::widgets::canvas::Context<'_>, record: &terramark::PolygonRecord, color: Color) {
    let poly = &record.polygon;
    for ring in std::iter::once(poly.exterior()).chain(poly.interiors()) {
        for line in ring.lines() {
            ctx.draw(&Line {
                x1: line.start.x,
                y1: line.start.y,
                x2: line.end.x,
                y2: line.end.y,
                color,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> MapView {
        MapView {
            x_bounds: [0.0, 100.0],
            y_bounds: [0.0, 50.0],
            inner: TuiRect::new(1, 1, 10, 5),
            revision: 0,
        }
    }

    #[test]
    fn corner_cells_map_to_corner_areas() {
        let v = view();
        let top_left = v.cell_to_map(1, 1).unwrap();
        assert!((top_left.x - 5.0).abs() < 1e-9);
        assert!((top_left.y - 45.0).abs() < 1e-9);

        let bottom_right = v.cell_to_map(10, 5).unwrap();
        assert!((bottom_right.x - 95.0).abs() < 1e-9);
        assert!((bottom_right.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn clicks_outside_canvas_are_ignored() {
        let v = view();
        assert_eq!(v.cell_to_map(0, 1), None);
        assert_eq!(v.cell_to_map(11, 1), None);
        assert_eq!(v.cell_to_map(5, 6), None);

        let never_drawn = MapView { inner: TuiRect::default(), ..v };
        assert_eq!(never_drawn.cell_to_map(0, 0), None);
    }

    #[test]
    fn palette_distinguishes_statuses() {
        for scheme in [ColorScheme::Dark, ColorScheme::Light] {
            let colors: Vec<Color> = CountryStatus::ALL.iter().map(|s| scheme.stroke(*s)).collect();
            assert_ne!(colors[0], colors[1]);
            assert_ne!(colors[1], colors[2]);
        }
        assert_eq!(ColorScheme::Dark.toggled().toggled(), ColorScheme::Dark);
    }
}
