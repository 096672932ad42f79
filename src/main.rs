//! Linux Process Manager
//!
//! An interactive terminal process manager that reads the live process
//! table from `/proc`, shows it as a sortable, filterable list or tree, and
//! can signal or renice processes.
//!
//! Controls:
//! - q: Quit
//! - k: Kill selected process (with confirmation)
//! - n: Set nice value
//! - P/N/U/C/M/S/A: Sort by pid/name/user/cpu/memory/state/ppid
//! - t: Toggle tree view
//! - /: Filter
//! - [: Slow down refresh rate
//! - ]: Speed up refresh rate
//! - ↑/↓: Navigate process list
//! - PgUp/PgDown: Scroll by page
//! - Home/End: Jump to start/end

use std::env;
use std::fs::File;
use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, DisableLineWrap, EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen},
};

use lpm::app::{cli, KeyAction, Session, SessionConfig};
use lpm::constants::{LOG_FILE_ENV, PASSWD_PATH, POLL_INTERVAL_MS};
use lpm::system::{Collector, PasswdResolver, ProcFs, SystemControl};
use lpm::ui;

/// Sends log output to the file named by `LPM_LOG_FILE`, if set.
///
/// The terminal is in raw mode while the session runs, so nothing is ever
/// logged to stderr.
fn init_logging() {
    let Some(path) = env::var_os(LOG_FILE_ENV) else {
        return;
    };
    match File::create(&path) {
        Ok(file) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(e) => eprintln!("warning: cannot open log file {:?}: {}", path, e),
    }
}

fn main() -> io::Result<()> {
    let args = cli::parse_args();
    init_logging();

    let config = SessionConfig::from(args);
    log::info!("Starting with {:?}", config);

    let collector = Collector::new(
        Box::new(ProcFs::new()),
        Box::new(PasswdResolver::load(PASSWD_PATH)),
    );
    let mut session = Session::new(collector, Box::new(SystemControl), &config);

    let mut stdout = io::stdout();

    // Set up terminal
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, DisableLineWrap, Hide)?;

    let result = run(&mut stdout, &mut session);

    // Restore terminal
    execute!(stdout, Show, EnableLineWrap, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    if let Err(ref e) = result {
        log::error!("Session ended with error: {}", e);
    }
    result
}

/// Main loop: poll for a key, service the refresh timer, redraw.
fn run(stdout: &mut io::Stdout, session: &mut Session) -> io::Result<()> {
    let (mut width, mut height) = terminal::size()?;
    session.resize(height);
    session.tick(Instant::now());

    let mut dirty = true;

    loop {
        if dirty {
            ui::render(stdout, &session.render_request(), width, height)?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(POLL_INTERVAL_MS))? {
            match event::read()? {
                // Only handle key PRESS events, ignore Release and Repeat
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if session.handle_key(key.code, key.modifiers, Instant::now()) == KeyAction::Exit {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(w, h) => {
                    width = w;
                    height = h;
                    session.resize(h);
                    dirty = true;
                }
                _ => {}
            }
        }

        if session.tick(Instant::now()) {
            dirty = true;
        }
    }

    log::info!("Session closed");
    Ok(())
}
