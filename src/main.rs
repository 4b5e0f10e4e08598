use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use image::{ImageBuffer, Rgb, RgbImage};
use log::info;

use cavegen::palette::Palette;
use cavegen::{generate_with_config, Cell, GenResult, GeneratorConfig, LevelRecord};

#[derive(Parser, Debug)]
#[command(name = "cavegen")]
#[command(about = "Generate seeded cave levels")]
struct Args {
    /// Level seed (random if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Map height in tiles
    #[arg(short, long, default_value = "80")]
    rows: usize,

    /// Map width in tiles
    #[arg(short, long, default_value = "120")]
    columns: usize,

    /// Seed shared by every level of one game (drives the palette)
    #[arg(short, long, default_value = "0")]
    game_seed: u64,

    /// Depth of the level; deeper levels are wetter and rockier
    #[arg(short, long, default_value = "0")]
    level: u32,

    /// JSON file overriding generation parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the level record as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write a PNG preview
    #[arg(long)]
    png: Option<PathBuf>,

    /// Pixels per tile in the PNG preview
    #[arg(long, default_value = "4")]
    scale: u32,

    /// Print the map to stdout
    #[arg(long)]
    ascii: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("cavegen: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> GenResult<()> {
    let config = match &args.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("generating level {} with seed {}", args.level, seed);

    let record = generate_with_config(&config, seed, args.rows, args.columns, args.game_seed, args.level)?;

    if args.ascii {
        print!("{}", ascii_with_features(&record));
    }
    if let Some(path) = &args.json {
        fs::write(path, serde_json::to_string_pretty(&record)?)?;
        info!("wrote {}", path.display());
    }
    if let Some(path) = &args.png {
        let palette = Palette::for_level(args.game_seed, args.level);
        write_preview(&record, &palette, args.scale.max(1), path)?;
        info!("wrote {}", path.display());
    }
    Ok(())
}

/// The tile map with start (`S`), exit (`E`), enemies (`e`), items (`$`)
/// and secrets (`?`) drawn over it.
fn ascii_with_features(record: &LevelRecord) -> String {
    let map = &record.tile_map;
    let mut rows: Vec<Vec<char>> = map.to_ascii().lines().map(|l| l.chars().collect()).collect();
    let mut mark = |cell: Cell, c: char| {
        if let Some(slot) = rows
            .get_mut(cell.i as usize)
            .and_then(|row| row.get_mut(cell.j as usize))
        {
            *slot = c;
        }
    };
    for item in &record.items {
        mark(Cell::new(item.i, item.j), '$');
    }
    for secret in &record.secrets {
        mark(secret.cell(), '?');
    }
    for enemy in &record.enemies {
        mark(enemy.cell(), 'e');
    }
    mark(record.start, 'S');
    mark(record.exit, 'E');

    let mut out = String::with_capacity(map.rows * (map.columns + 1));
    for row in rows {
        out.extend(row);
        out.push('\n');
    }
    out
}

fn write_preview(record: &LevelRecord, palette: &Palette, scale: u32, path: &Path) -> GenResult<()> {
    let map = &record.tile_map;
    let mut img: RgbImage = ImageBuffer::new(map.columns as u32 * scale, map.rows as u32 * scale);
    let mut fill = |cell: Cell, color: Rgb<u8>| {
        for dy in 0..scale {
            for dx in 0..scale {
                let (x, y) = (cell.j as u32 * scale + dx, cell.i as u32 * scale + dy);
                if x < img.width() && y < img.height() {
                    img.put_pixel(x, y, color);
                }
            }
        }
    };

    for i in 0..map.rows as i32 {
        for j in 0..map.columns as i32 {
            if let Some(tile_type) = map.get(i, j) {
                fill(Cell::new(i, j), palette.rgb8(tile_type));
            }
        }
    }
    for item in &record.items {
        fill(Cell::new(item.i, item.j), Rgb([240, 200, 40]));
    }
    for secret in &record.secrets {
        fill(secret.cell(), Rgb([250, 250, 250]));
    }
    for enemy in &record.enemies {
        let [r, g, b] = enemy.color;
        fill(enemy.cell(), Rgb([(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]));
    }
    fill(record.start, Rgb([40, 220, 90]));
    fill(record.exit, Rgb([230, 40, 40]));

    img.save(path)?;
    Ok(())
}
