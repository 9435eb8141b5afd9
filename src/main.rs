//! ShelfSpot - find a book on the shelf and highlight where it sits
//!
//! Command-line front end: searches the catalog, edits it, and renders
//! highlights of a reference photo to files or a window.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use shelfspot::catalog::{BookMatch, BookRecord, BookUpdate, Catalog};
use shelfspot::config::{self, AppConfig};
use shelfspot::geometry::{to_pixel_region, NormBox, PixelRegion, Quad, Region};
use shelfspot::render::{load_image, RenderConfig, Renderer};
use shelfspot::sink::{FileSink, HighlightOutput, HighlightSink, WindowSink};
use shelfspot::storage;

/// Number of "did you mean" hints shown when nothing matches
const SUGGESTIONS: usize = 3;

/// ShelfSpot - find a book on the shelf
#[derive(Parser, Debug)]
#[command(name = "shelfspot")]
#[command(about = "Find a book on the shelf by name and highlight where it sits")]
struct Args {
    /// Config file (defaults to config.toml in the config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog file (overrides the configured one)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the book a query refers to
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// List every book in the catalog
    List,

    /// Print the pixel region of a book on an image of the given size
    Locate {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
    },

    /// Highlight a book on the reference photo
    Render {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Reference photo (overrides the configured one)
        #[arg(long)]
        image: Option<PathBuf>,
        /// Output file; .gif keeps every animation frame
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Render a pulsing animation instead of a still
        #[arg(long)]
        animate: bool,
        /// Show the result in a window
        #[arg(long)]
        window: bool,
        /// Leave out the title caption
        #[arg(long)]
        no_caption: bool,
    },

    /// Add a book
    Add {
        key: String,
        /// Display name (defaults to the key)
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "0")]
        shelf: u8,
        /// Box as "cx,cy,w,h" in 0-1 image coordinates
        #[arg(long = "box")]
        bbox: Option<String>,
        /// Outline as "x,y;x,y;x,y;x,y" in 0-1 image coordinates
        #[arg(long)]
        points: Option<String>,
    },

    /// Change a book's name, shelf or position
    Update {
        key: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        shelf: Option<u8>,
        /// Box as "cx,cy,w,h"; drops any stored outline
        #[arg(long = "box")]
        bbox: Option<String>,
        /// Outline as "x,y;x,y;x,y;x,y"; the box is derived from it
        #[arg(long)]
        points: Option<String>,
    },

    /// Remove a book
    Remove { key: String },

    /// Write the built-in catalog to the catalog file
    InitCatalog {
        /// Overwrite an existing catalog
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_or_default_config(args.config.as_deref())?;
    let catalog_path = match args.catalog.clone().or_else(|| config.general.catalog_path.clone()) {
        Some(path) => path,
        None => storage::default_catalog_path()?,
    };

    match args.command {
        Command::Search { query } => search(&catalog_path, &query.join(" ")),
        Command::List => list(&catalog_path),
        Command::Locate { query, width, height } => {
            locate(&catalog_path, &query.join(" "), width, height)
        }
        Command::Render {
            query,
            image,
            output,
            animate,
            window,
            no_caption,
        } => {
            let opts = RenderOptions {
                image,
                output,
                animate,
                window,
                caption: !no_caption,
            };
            render(&config, &catalog_path, &query.join(" "), opts)
        }
        Command::Add {
            key,
            name,
            shelf,
            bbox,
            points,
        } => {
            let region = parse_region(bbox.as_deref(), points.as_deref())?
                .ok_or_else(|| anyhow!("add needs --box or --points"))?;
            let name = name.unwrap_or_else(|| key.clone());
            let mut catalog = storage::load_or_builtin(&catalog_path)?;
            catalog.add(BookRecord::new(&key, &name, shelf, region))?;
            storage::save_catalog(&catalog, &catalog_path)?;
            println!("Added '{}'", key);
            Ok(())
        }
        Command::Update {
            key,
            name,
            shelf,
            bbox,
            points,
        } => {
            let update = build_update(name, shelf, bbox.as_deref(), points.as_deref())?;
            if update.is_empty() {
                bail!("nothing to update; pass --name, --shelf, --box or --points");
            }
            let mut catalog = storage::load_or_builtin(&catalog_path)?;
            catalog.update(&key, update)?;
            storage::save_catalog(&catalog, &catalog_path)?;
            println!("Updated '{}'", key);
            Ok(())
        }
        Command::Remove { key } => {
            let mut catalog = storage::load_or_builtin(&catalog_path)?;
            let removed = catalog.remove(&key)?;
            storage::save_catalog(&catalog, &catalog_path)?;
            println!("Removed '{}' ({})", removed.key, removed.name);
            Ok(())
        }
        Command::InitCatalog { force } => {
            if catalog_path.exists() && !force {
                bail!("{:?} already exists; use --force to overwrite it", catalog_path);
            }
            let catalog = Catalog::builtin();
            storage::save_catalog(&catalog, &catalog_path)?;
            println!("Wrote {} books to {}", catalog.len(), catalog_path.display());
            Ok(())
        }
    }
}

/// Load configuration from the given file, the default location, or defaults
fn load_or_default_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        let config = config::load_config(path)?;
        info!("Loaded configuration from {:?}", path);
        return Ok(config);
    }

    if let Ok(config_dir) = storage::get_config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            match config::load_config(&config_path) {
                Ok(config) => {
                    info!("Loaded configuration from {:?}", config_path);
                    return Ok(config);
                }
                Err(e) => warn!("Ignoring config file: {:#}", e),
            }
        }
    }
    info!("Using default configuration");
    Ok(AppConfig::default())
}

fn search(catalog_path: &Path, query: &str) -> Result<()> {
    let catalog = storage::load_or_builtin(catalog_path)?;
    match catalog.search(query) {
        Some(m) => print_match(&m),
        None => print_no_match(&catalog, query),
    }
    Ok(())
}

fn list(catalog_path: &Path) -> Result<()> {
    let catalog = storage::load_or_builtin(catalog_path)?;
    for record in catalog.iter() {
        let outline = if record.points.is_some() { " (outline)" } else { "" };
        println!("[shelf {}] {:<35} {}{}", record.shelf, record.key, record.name, outline);
    }
    println!("{} books", catalog.len());
    Ok(())
}

fn locate(catalog_path: &Path, query: &str, width: u32, height: u32) -> Result<()> {
    let catalog = storage::load_or_builtin(catalog_path)?;
    let m = find(&catalog, query)?;
    print_match(&m);

    match to_pixel_region(&m.record.render_region(), width, height)? {
        PixelRegion::Box(b) => {
            println!("box: x={} y={} width={} height={}", b.x, b.y, b.width, b.height)
        }
        PixelRegion::Polygon(p) => {
            let points: Vec<String> =
                p.points.iter().map(|(x, y)| format!("({:.1}, {:.1})", x, y)).collect();
            println!("polygon: {}", points.join(" "));
        }
    }
    Ok(())
}

struct RenderOptions {
    image: Option<PathBuf>,
    output: Option<PathBuf>,
    animate: bool,
    window: bool,
    caption: bool,
}

fn render(config: &AppConfig, catalog_path: &Path, query: &str, opts: RenderOptions) -> Result<()> {
    let catalog = storage::load_or_builtin(catalog_path)?;
    let m = find(&catalog, query)?;
    print_match(&m);

    let image_path = opts
        .image
        .or_else(|| config.general.reference_image.clone())
        .ok_or_else(|| anyhow!("no reference image; pass --image or set general.reference_image"))?;
    let image = load_image(&image_path)?;

    let renderer = Renderer::new(RenderConfig::from(config));
    let region = m.record.render_region();
    let caption = opts.caption.then_some(m.record.name.as_str());

    let output = if opts.animate {
        HighlightOutput::Animation(renderer.render_animation(&image, &region, caption)?)
    } else {
        HighlightOutput::Still(renderer.render(&image, &region, caption)?)
    };

    let mut sinks: Vec<Box<dyn HighlightSink>> = Vec::new();
    let output_path = match opts.output {
        Some(path) => Some(path),
        None if !opts.window => {
            let ext = if opts.animate { "gif" } else { "png" };
            let dir = config.general.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
            Some(dir.join(format!("{}.{}", file_stem(m.key), ext)))
        }
        None => None,
    };
    if let Some(path) = output_path {
        sinks.push(Box::new(FileSink::new(path)));
    }
    if opts.window {
        sinks.push(Box::new(WindowSink::new(format!("ShelfSpot - {}", m.record.name))));
    }

    for sink in &mut sinks {
        sink.present(&output)?;
    }
    Ok(())
}

fn find<'a>(catalog: &'a Catalog, query: &str) -> Result<BookMatch<'a>> {
    match catalog.search(query) {
        Some(m) => Ok(m),
        None => {
            print_no_match(catalog, query);
            bail!("no book matches '{}'", query)
        }
    }
}

fn print_match(m: &BookMatch<'_>) {
    println!(
        "{} [{}] shelf {} (matched by {})",
        m.record.name,
        m.key,
        m.record.shelf,
        m.rule.name()
    );
}

fn print_no_match(catalog: &Catalog, query: &str) {
    println!("No book matches '{}'", query);
    let hints = catalog.suggest(query, SUGGESTIONS);
    if !hints.is_empty() {
        println!("Did you mean: {}?", hints.join(", "));
    }
}

/// File name for a rendered book
fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn parse_numbers(text: &str) -> Result<Vec<f32>> {
    text.split(',')
        .map(|v| {
            v.trim()
                .parse::<f32>()
                .with_context(|| format!("'{}' is not a number", v.trim()))
        })
        .collect()
}

fn parse_box(text: &str) -> Result<NormBox> {
    match parse_numbers(text)?.as_slice() {
        &[cx, cy, w, h] => {
            let b = NormBox::new(cx, cy, w, h);
            b.validate()?;
            Ok(b)
        }
        other => bail!("box needs 4 values (cx,cy,w,h), got {}", other.len()),
    }
}

fn parse_points(text: &str) -> Result<Quad> {
    let mut points = Vec::new();
    for pair in text.split(';').filter(|p| !p.trim().is_empty()) {
        match parse_numbers(pair)?.as_slice() {
            &[x, y] => points.push((x, y)),
            _ => bail!("point '{}' needs 2 values (x,y)", pair.trim()),
        }
    }
    let quad = Quad::from_points(&points)?;
    quad.validate()?;
    Ok(quad)
}

fn parse_region(bbox: Option<&str>, points: Option<&str>) -> Result<Option<Region>> {
    match (bbox, points) {
        (_, Some(points)) => Ok(Some(Region::Quad(parse_points(points)?))),
        (Some(bbox), None) => Ok(Some(Region::Box(parse_box(bbox)?))),
        (None, None) => Ok(None),
    }
}

fn build_update(
    name: Option<String>,
    shelf: Option<u8>,
    bbox: Option<&str>,
    points: Option<&str>,
) -> Result<BookUpdate> {
    Ok(BookUpdate {
        name,
        shelf,
        position: bbox.map(parse_box).transpose()?,
        points: points.map(parse_points).transpose()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_box() {
        let b = parse_box("0.5, 0.25,0.1,0.2").unwrap();
        assert_eq!(b, NormBox::new(0.5, 0.25, 0.1, 0.2));
        assert!(parse_box("0.5,0.5,0.1").is_err());
        assert!(parse_box("a,b,c,d").is_err());
        assert!(parse_box("0.5,0.5,-0.1,0.1").is_err());
    }

    #[test]
    fn test_parse_points() {
        let q = parse_points("0.1,0.1; 0.2,0.1; 0.2,0.3; 0.1,0.3").unwrap();
        assert_eq!(q.bounding_box(), NormBox::from_extents(0.1, 0.1, 0.2, 0.3));
        assert!(parse_points("0.1,0.1;0.2,0.1;0.2,0.3").is_err());
        assert!(parse_points("0.1,0.1,0.3;0.2,0.1;0.2,0.3;0.1,0.3").is_err());
    }

    #[test]
    fn test_points_win_over_box() {
        let region =
            parse_region(Some("0.5,0.5,0.1,0.1"), Some("0.1,0.1;0.2,0.1;0.2,0.3;0.1,0.3")).unwrap();
        assert!(matches!(region, Some(Region::Quad(_))));
        assert_eq!(parse_region(None, None).unwrap(), None);
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("typography 34"), "typography_34");
        assert_eq!(file_stem("what's mine is yours"), "what_s_mine_is_yours");
    }

    #[test]
    fn test_cli_parses() {
        let args = Args::parse_from([
            "shelfspot", "-v", "render", "lean", "impact", "--animate", "-o", "out.gif",
        ]);
        assert!(args.verbose);
        match args.command {
            Command::Render { query, animate, output, .. } => {
                assert_eq!(query.join(" "), "lean impact");
                assert!(animate);
                assert_eq!(output, Some(PathBuf::from("out.gif")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
