//! binary subset tool
//!
//! Takes a font file and a description of the desired subset, and writes a
//! new font file containing only the glyphs that subset needs.

use clap::Parser;
use sfnt_read::FontRef;
use sfnt_subset::{parse_unicodes, populate_gids, subset_font, Plan};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The input font file.
    #[arg(short, long)]
    path: std::path::PathBuf,

    /// List of glyph ids
    #[arg(short, long)]
    gids: Option<String>,

    /// List of unicode codepoints
    #[arg(short, long)]
    unicodes: Option<String>,

    /// Characters to retain, given as literal text
    #[arg(short, long)]
    text: Option<String>,

    /// The output font file
    #[arg(short, long)]
    output_file: std::path::PathBuf,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let gids = match populate_gids(&args.gids.unwrap_or_default()) {
        Ok(gids) => gids,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let mut unicodes = match parse_unicodes(&args.unicodes.unwrap_or_default()) {
        Ok(unicodes) => unicodes,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    if let Some(text) = &args.text {
        unicodes.extend(text.chars().map(|c| c as u32));
    }

    let font_bytes = std::fs::read(&args.path).expect("Invalid input font file found");
    let font = FontRef::new(&font_bytes).expect("Error reading font bytes");

    let plan = match Plan::new(&gids, &unicodes, &font) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let output_bytes = match subset_font(&font, &plan) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    std::fs::write(&args.output_file, output_bytes).expect("Error writing the output font file");
}
