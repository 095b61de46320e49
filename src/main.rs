use std::env;
use std::path::PathBuf;
use std::process;

use tactical_map::generator::grid_size;
use tactical_map::renderer::{image_side, load_font, save_png, TerrainRenderer};
use tactical_map::{
    cell_label, default_fleet, place_fleet, reveal_moves, GenerationSettings, TerrainError, TerrainGenerator,
    TerrainGrid, TerrainResult, DEFAULT_GRID_SIZE, REFERENCE_SEED,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

struct Options {
    seed: i64,
    size: usize,
    settings: Option<PathBuf>,
    png: Option<PathBuf>,
    cell_px: u32,
    font: Option<PathBuf>,
    json: bool,
    ships: bool,
    color: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            seed: REFERENCE_SEED,
            size: DEFAULT_GRID_SIZE,
            settings: None,
            png: None,
            cell_px: 60,
            font: None,
            json: false,
            ships: false,
            color: true,
        }
    }
}

fn print_help() {
    println!("Tactical map terrain generator");
    println!("\nUsage: tactical-map-cli [OPTIONS]");
    println!("\nOptions:");
    println!("  --seed <int>         Terrain seed (default: 1, the reference board)");
    println!("  --size <int>         Board edge length (default: 6)");
    println!("  --settings <file>    JSON generation settings");
    println!("  --png <file>         Save the board as a PNG");
    println!("  --cell <px>          Pixels per cell in the PNG (default: 60)");
    println!("  --font <file.ttf>    Font for cell labels in the PNG");
    println!("  --ships              Place the fleet on sea tiles and reveal opening shots");
    println!("  --json               Print the grid as JSON instead of ASCII");
    println!("  --no-color           Disable ANSI colours");
    println!("  --help               Show this help message");
    println!("\nExample:");
    println!("  tactical-map-cli --seed 42 --size 8 --ships --png board.png");
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> TerrainResult<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| TerrainError::InvalidArgument(format!("{flag} needs a value")))
}

fn parse_number<T: std::str::FromStr>(raw: &str, flag: &str) -> TerrainResult<T> {
    raw.parse()
        .map_err(|_| TerrainError::InvalidArgument(format!("{flag} expects an integer, got '{raw}'")))
}

/// `None` means help was printed and the process should exit.
fn parse_args(args: &[String]) -> TerrainResult<Option<Options>> {
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                options.seed = parse_number(value(args, i, "--seed")?, "--seed")?;
                i += 1;
            }
            "--size" => {
                let size: i64 = parse_number(value(args, i, "--size")?, "--size")?;
                options.size = grid_size(size)?;
                i += 1;
            }
            "--settings" => {
                options.settings = Some(PathBuf::from(value(args, i, "--settings")?));
                i += 1;
            }
            "--png" => {
                options.png = Some(PathBuf::from(value(args, i, "--png")?));
                i += 1;
            }
            "--cell" => {
                options.cell_px = parse_number(value(args, i, "--cell")?, "--cell")?;
                i += 1;
            }
            "--font" => {
                options.font = Some(PathBuf::from(value(args, i, "--font")?));
                i += 1;
            }
            "--ships" => options.ships = true,
            "--json" => options.json = true,
            "--no-color" => options.color = false,
            "--help" => {
                print_help();
                return Ok(None);
            }
            other => {
                return Err(TerrainError::InvalidArgument(format!("unknown option '{other}'")));
            }
        }
        i += 1;
    }

    if options.png.is_some() {
        image_side(options.size, options.cell_px)?;
    }

    Ok(Some(options))
}

fn print_terrain_info(grid: &TerrainGrid, color: bool) {
    let total = (grid.size() * grid.size()).max(1);
    println!("\nBiome Distribution:");
    for (kind, count) in grid.histogram() {
        let percentage = count as f64 / total as f64 * 100.0;
        println!("  {} - {:.1}%", kind.display_name(), percentage);
    }
    println!("\nSea tiles: {}", grid.sea_tiles().len());
    println!("\nLegend:\n  {}", TerrainRenderer::legend(color));
}

fn run(options: Options) -> TerrainResult<()> {
    let generator = match &options.settings {
        Some(path) => {
            info!(path = %path.display(), "loading generation settings");
            TerrainGenerator::with_settings(GenerationSettings::load(path)?)?
        }
        None => TerrainGenerator::default(),
    };

    let grid = generator.generate(options.seed, options.size);
    info!(seed = options.seed, size = grid.size(), "terrain generated");

    let (fleet, moves) = if options.ships {
        let fleet = place_fleet(&grid, &default_fleet(), options.seed)?;
        let moves = reveal_moves(&grid, &fleet, options.seed)?;
        (Some(fleet), moves)
    } else {
        (None, Vec::new())
    };

    if options.json {
        let output = serde_json::json!({
            "seed": options.seed,
            "terrain": grid,
            "fleet": fleet,
            "moves": moves,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Terrain (seed {}):\n", options.seed);
        print!("{}", TerrainRenderer::render_ascii(&grid, options.color));
        print_terrain_info(&grid, options.color);
        if let Some(fleet) = &fleet {
            println!("\nFleet:");
            for ship in &fleet.ships {
                let cells: Vec<String> = ship.cells.iter().map(|&(r, c)| cell_label(r, c)).collect();
                println!("  {} ({:?}): {}", ship.name, ship.orientation, cells.join(" "));
            }
            println!("\nRevealed shots:");
            for shot in &moves {
                let label = cell_label(shot.row, shot.col);
                match &shot.ship {
                    Some(ship) => println!("  {label} hit ({ship})"),
                    None => println!("  {label} miss"),
                }
            }
        }
    }

    if let Some(path) = &options.png {
        let mut img = TerrainRenderer::render_to_image(&grid, options.cell_px)?;
        if let Some(font_path) = &options.font {
            let font = load_font(font_path)?;
            TerrainRenderer::draw_labels(&mut img, &grid, options.cell_px, &font);
        }
        if let Some(fleet) = &fleet {
            TerrainRenderer::draw_fleet(&mut img, fleet, options.cell_px);
            TerrainRenderer::draw_moves(&mut img, &moves, options.cell_px);
        }
        save_png(&img, path)?;
        info!(path = %path.display(), "map saved");
    }

    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tactical_map=info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let result = parse_args(&args).and_then(|options| match options {
        Some(options) => run(options),
        None => Ok(()),
    });

    if let Err(e) = result {
        error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
