mod app;
mod ui;

use std::fs::File;
use std::path::PathBuf;

use keybed_audio::{AudioPlayer, NullPlayer, SoxPlayer};
use keybed_core::action_log::{self, ActionLog};
use keybed_core::config::Config;
use keybed_core::{Instrument, KeyController};

use app::App;
use ui::TerminalUi;

fn init_logging(verbose: bool) {
    use simplelog::{LevelFilter, WriteLogger};

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("keybed")
        .join("keybed.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path).or_else(|_| File::create("/tmp/keybed.log")) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("keybed: cannot create log file: {}", e);
            return;
        }
    };

    if WriteLogger::init(log_level, simplelog::Config::default(), log_file).is_err() {
        eprintln!("keybed: logger already initialized");
        return;
    }

    log::info!("keybed starting (log level: {:?})", log_level);
}

fn make_player(config: &Config, mute: bool) -> Box<dyn AudioPlayer> {
    if mute {
        log::info!("muted, using null player");
        return Box::new(NullPlayer);
    }
    let player = SoxPlayer::new(config.player_program(), config.sample_rate());
    if !player.is_available() {
        log::warn!(
            "'{}' not found; key presses will be silent (install sox)",
            player.program()
        );
    }
    Box::new(player)
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    let mute = args.iter().any(|a| a == "--mute");
    let record = args.iter().any(|a| a == "--record");
    let replay_path = match args.iter().position(|a| a == "--replay") {
        Some(i) => match args.get(i + 1).filter(|a| !a.starts_with('-')) {
            Some(path) => Some(PathBuf::from(path)),
            None => {
                eprintln!("keybed: --replay needs a file argument");
                eprintln!("usage: keybed [--verbose] [--mute] [--record] [--replay <file>]");
                std::process::exit(1);
            }
        },
        None => None,
    };
    init_logging(verbose);

    let config = Config::load();
    let instrument = match Instrument::init(&config.instrument_settings()) {
        Ok(i) => i,
        Err(e) => {
            log::error!("instrument init failed: {}", e);
            eprintln!("keybed: {}", e);
            std::process::exit(1);
        }
    };
    let mut controller = KeyController::new(instrument, make_player(&config, mute));

    if let Some(path) = replay_path {
        return match action_log::replay_action_log(&path, &mut controller) {
            Ok(count) => {
                let state = controller.state();
                println!(
                    "replayed {} actions: volume {}, waveform {}, held {}",
                    count,
                    state.volume,
                    state.waveform.label(),
                    state.held_keys()
                );
                Ok(())
            }
            Err(e) => {
                eprintln!("keybed: replay of {} failed: {}", path.display(), e);
                std::process::exit(1);
            }
        };
    }

    let action_log = if record {
        let log = ActionLog::open_default();
        if log.is_none() {
            eprintln!(
                "keybed: cannot open action log at {}",
                action_log::default_log_path().display()
            );
        }
        log
    } else {
        None
    };

    let mut app = App::new(
        controller,
        config.keyboard_layout(),
        config.release_timeout(),
        action_log,
    );

    let mut terminal = TerminalUi::open()?;
    let result = app.run(&mut terminal);
    terminal.close()?;
    result
}
