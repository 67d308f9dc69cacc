//! Terminal presentation for tg-core layouts
//!
//! Maps node kinds and role flags to glyphs and colors and redraws on
//! demand. All layout logic lives in tg-core; regeneration here simply
//! builds a fresh engine with a new seed.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use tg_core::MapRng;
use tg_core::graph::{GraphConfig, GraphError, GridPos, Node, TileGraph};

/// Viewer state: the current layout plus what is needed to rebuild it
pub struct App {
    graph: TileGraph,
    start: GridPos,
}

impl App {
    /// Generate the initial layout
    pub fn new(config: GraphConfig, rng: MapRng, start: GridPos) -> Result<Self, GraphError> {
        let mut graph = TileGraph::new(config, rng)?;
        graph.generate_map(start)?;
        Ok(Self { graph, start })
    }

    pub fn graph(&self) -> &TileGraph {
        &self.graph
    }

    /// Throw the current layout away and generate with a fresh seed
    pub fn regenerate(&mut self) -> Result<(), GraphError> {
        let config = self.graph.config().clone();
        let mut graph = TileGraph::new(config, MapRng::from_entropy())?;
        graph.generate_map(self.start)?;
        self.graph = graph;
        Ok(())
    }

    /// Render the grid with a status title and key help
    pub fn draw(&self, frame: &mut Frame) {
        let [map_area, help_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

        let config = self.graph.config();
        let mut lines = Vec::with_capacity(config.height as usize);
        for y in 0..config.height {
            let mut spans = Vec::with_capacity(config.width as usize);
            for x in 0..config.width {
                spans.push(cell_span(self.graph.node_at(GridPos::new(x, y))));
            }
            lines.push(Line::from(spans));
        }

        let title = format!(
            " tilegraph | seed {} | {} rooms | {} halls ",
            self.graph.seed(),
            self.graph.room_count(),
            self.graph.hall_count(),
        );
        let map = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(map, map_area);

        let help = Paragraph::new(Line::from(" r: regenerate   q: quit "))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, help_area);
    }
}

/// Glyph and role color for one cell: origin green, end red, special
/// magenta, plain rooms white, hallways gray
fn cell_span(node: Option<&Node>) -> Span<'static> {
    let Some(node) = node else {
        return Span::raw(" ");
    };

    let color = match node {
        Node::Room(room) if room.is_origin() => Color::Green,
        Node::Room(room) if room.is_end() => Color::Red,
        Node::Room(room) if room.is_special() => Color::Magenta,
        Node::Room(_) => Color::White,
        Node::Hallway(_) => Color::Gray,
    };
    Span::styled(node.symbol().to_string(), Style::default().fg(color))
}
