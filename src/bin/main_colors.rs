use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use main_colors_picker::{PickerOptions, SelectionMode, pick_main_colors, to_hex};

/// Print the main colors of a list of RGB colors.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Colors as a JSON array of [r, g, b] arrays, e.g. '[[255,0,0],[250,4,3]]'
    colors: String,

    /// Groups per channel, 1 to 256 (default 8)
    #[arg(short = 'l', long)]
    variety_level: Option<f64>,

    /// How each group is reduced to one color
    #[arg(short, long, value_enum)]
    mode: Option<SelectionMode>,

    /// Options as JSON, e.g. '{"colorsVarietyLevel":4,"mode":"frequency"}'.
    /// Explicit flags win over these.
    #[arg(short, long)]
    options: Option<String>,

    /// Print one RRGGBB line per color instead of JSON
    #[arg(long)]
    hex: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut options = match &args.options {
        Some(json) => serde_json::from_str::<PickerOptions>(json).context("invalid --options JSON")?,
        None => PickerOptions::new(),
    };
    if let Some(level) = args.variety_level {
        options.colors_variety_level = Some(level);
    }
    if let Some(mode) = args.mode {
        options.mode = mode;
    }

    let colors: Vec<[f64; 3]> =
        serde_json::from_str(&args.colors).context("colors must be a JSON array of [r, g, b] arrays")?;
    info!("picking main colors from {} colors with {:?}", colors.len(), options);

    let main_colors = pick_main_colors(&colors, &options).context("main color extraction failed")?;

    if args.hex {
        for color in &main_colors {
            println!("{}", to_hex(*color));
        }
    } else {
        println!("{}", serde_json::to_string(&main_colors)?);
    }

    Ok(())
}
