use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use key_pad::app::infrastructure::logging::init_logging;
use key_pad::app::services::script::{execute, parse_line, show};
use key_pad::app::{CaretTable, EditorSession, EditorSettings, FileStore, LogNotifier, Result};

/// Drive the virtual-keyboard editor from a script or from stdin
#[derive(Parser, Debug)]
#[command(name = "KeyPad")]
#[command(version)]
struct Args {
    /// Settings file (default: config dir/keypad/settings.json)
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Directory for saved files, overriding the settings
    #[arg(long, value_name = "DIR")]
    store: Option<PathBuf>,

    /// Read commands from this file instead of stdin
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Log filter directive, e.g. "debug" (RUST_LOG still wins)
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

fn main() {
    let args = Args::parse();

    let settings = match args.settings {
        Some(ref path) => EditorSettings::load_from(path).unwrap_or_default(),
        None => EditorSettings::load(),
    };
    init_logging(args.log.as_deref().unwrap_or(&settings.log_filter));

    if let Err(e) = run(&args, &settings) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args, settings: &EditorSettings) -> Result<()> {
    let store_dir = args
        .store
        .clone()
        .unwrap_or_else(|| settings.resolved_store_dir());
    tracing::info!("Saved files live in {}", store_dir.display());

    let mut session = EditorSession::new(
        settings,
        CaretTable::new(),
        FileStore::new(store_dir),
        Box::new(LogNotifier),
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Scripts stop at the first bad line; interactive input just reports it.
    let (reader, strict): (Box<dyn BufRead>, bool) = match args.script {
        Some(ref path) => (Box::new(BufReader::new(File::open(path)?)), true),
        None => (Box::new(BufReader::new(io::stdin())), false),
    };

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let command = match parse_line(i + 1, &line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) if strict => return Err(e),
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };
        if !execute(&mut session, command, &mut out)? {
            break;
        }
        out.flush()?;
    }

    if strict {
        show(&session, &mut out)?;
    }
    Ok(())
}
