use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use miette::Result;

use lc3::{term, Image, RunState, TermConsole};

/// A fast & convenient virtual machine for the LC3 architecture.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Pre-assembled `.obj` images to load, in order
    images: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.images.is_empty() {
        println!("lc3 [image-file1] ...");
        std::process::exit(2);
    }

    let mut state = RunState::new(Box::new(TermConsole::new()));
    for path in &args.images {
        let image = match Image::read_from(path) {
            Ok(image) => image,
            Err(report) => {
                println!("failed to load image: {}", path.display());
                return Err(report);
            }
        };
        eprintln!(
            "{:>12} image {}",
            "Loading".green().bold(),
            path.display()
        );
        state.load_image(&image);
    }

    eprintln!("{:>12} at 0x{:04x}", "Running".green().bold(), state.pc());
    term::enable_raw_mode();
    state.run();
    term::disable_raw_mode();
    eprintln!("{:>12}", "Halted".cyan().bold());

    Ok(())
}
