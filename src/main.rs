use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use instant::Duration;

use crossfill::{find_fill, render_grid, FillOptions, GridConfig, WordList};

/// Fill a crossword structure with words from a word list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Structure file: one row per line, `_` for open cells and `#` for blocks
    structure: PathBuf,

    /// Word list file, one word per line
    words: PathBuf,

    /// Optional file to save the filled grid to
    output: Option<PathBuf>,

    /// Give up after this many seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Log fill statistics and propagation details
    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    crossfill::log::init_logger(cli.debug || std::env::var("CROSSFILL_DEBUG").is_ok());

    if let Err(e) = try_main(&cli) {
        eprintln!("Error: {e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Load the structure and word list, fill the grid, and print (and optionally save) it.
///
/// An unsolvable puzzle is reported as `No solution.` and is not an error.
fn try_main(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let grid = GridConfig::load_from_path(&cli.structure)?;
    let word_list = WordList::load_from_path(&cli.words)?;
    log::debug!(
        "Loaded {} variables and {} words",
        grid.variable_count(),
        word_list.len()
    );

    let options = match cli.timeout {
        Some(seconds) => FillOptions::with_timeout(Duration::from_secs(seconds)),
        None => FillOptions::default(),
    };

    let result = match find_fill(&grid, &word_list, &options) {
        Ok(result) => result,
        Err(failure) if failure.is_unsolvable() => {
            log::debug!("{failure}");
            println!("No solution.");
            return Ok(());
        }
        Err(failure) => return Err(failure.into()),
    };

    log::debug!("{:?}", result.statistics);

    let display_grid = render_grid(&grid, &word_list, &result.assignment);
    println!("{display_grid}");

    if let Some(output) = &cli.output {
        fs::write(output, format!("{display_grid}\n"))?;
        log::info!("Wrote grid to {}", output.display());
    }

    Ok(())
}
