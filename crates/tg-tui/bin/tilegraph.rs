//! Dungeon layout generator CLI
//!
//! Generates a layout and prints the text dump with its seed and node
//! counts, or opens an interactive terminal viewer where `r` regenerates
//! the map with a fresh seed.

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use tg_core::MapRng;
use tg_core::graph::{GraphConfig, GridPos, TileGraph};
use tg_tui::App;

#[derive(Parser, Debug)]
#[command(name = "tilegraph")]
#[command(version, about = "Generate a dungeon layout of rooms and hallways")]
struct Args {
    /// Grid width in cells (minimum 3)
    #[arg(long, default_value_t = 11)]
    width: i32,

    /// Grid height in cells (minimum 3)
    #[arg(long, default_value_t = 11)]
    height: i32,

    /// Maximum rooms along one branch of the layout
    #[arg(short = 'b', long = "branch", default_value_t = 7)]
    max_rooms_per_branch: u32,

    /// Chance of a supplemental hallway between each adjacent room pair
    #[arg(long, default_value_t = 0.15)]
    extra_halls_chance: f64,

    /// Maximum number of special rooms to tag
    #[arg(long, default_value_t = 2)]
    max_special_rooms: u32,

    /// Chance of tagging each candidate room as special
    #[arg(long, default_value_t = 0.3)]
    special_rooms_chance: f64,

    /// RNG seed; random when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Start position as `x,y`; grid center when omitted
    #[arg(long, value_parser = parse_pos)]
    start: Option<GridPos>,

    /// Open the interactive viewer instead of printing the dump
    #[arg(short, long)]
    interactive: bool,
}

fn parse_pos(arg: &str) -> Result<GridPos, String> {
    let (x, y) = arg
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{arg}`"))?;
    let x = x.trim().parse().map_err(|_| format!("invalid x `{x}`"))?;
    let y = y.trim().parse().map_err(|_| format!("invalid y `{y}`"))?;
    Ok(GridPos::new(x, y))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = GraphConfig {
        width: args.width,
        height: args.height,
        max_rooms_per_branch: args.max_rooms_per_branch,
        extra_halls_chance: args.extra_halls_chance,
        max_special_rooms: args.max_special_rooms,
        special_rooms_chance: args.special_rooms_chance,
    };
    let start = args.start.unwrap_or_else(|| config.center());
    let rng = match args.seed {
        Some(seed) => MapRng::new(seed),
        None => MapRng::from_entropy(),
    };

    if args.interactive {
        let app = match App::new(config, rng, start) {
            Ok(app) => app,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::from(2);
            }
        };
        if let Err(err) = run_viewer(app) {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    let mut graph = match TileGraph::new(config, rng) {
        Ok(graph) => graph,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };
    if let Err(err) = graph.generate_map(start) {
        eprintln!("error: {err}");
        return ExitCode::from(2);
    }

    println!("seed: {}", graph.seed());
    println!(
        "rooms: {}, halls: {}",
        graph.room_count(),
        graph.hall_count()
    );
    print!("{graph}");

    ExitCode::SUCCESS
}

fn run_viewer(mut app: App) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('r') => app.regenerate().map_err(io::Error::other)?,
                _ => {}
            }
        }
    }
}
