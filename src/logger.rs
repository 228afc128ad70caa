use log::{Level, LevelFilter, Log, Metadata, Record};
use std::{
    fs::{File, OpenOptions},
    path::PathBuf,
    sync::Mutex,
};
use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

use crate::prelude::*;


#[derive(Debug, confique::Config)]
pub(crate) struct LogConfig {
    /// Determines how many messages are logged. Log messages below this
    /// level are discarded. One of: "off", "error", "warn", "info",
    /// "debug" or "trace".
    #[config(default = "info")]
    pub(crate) level: LevelFilter,

    /// If this is set, log messages are also written to this file.
    pub(crate) file: Option<PathBuf>,

    /// If this is set to `false`, log messages are not written to stdout.
    #[config(default = true)]
    pub(crate) stdout: bool,
}


/// Our own `Log` implementation.
struct Logger {
    level_filter: LevelFilter,
    file: Option<Mutex<File>>,
    stdout: Option<Mutex<StandardStream>>,
}

/// Installs our own logger globally. Must only be called once!
pub(crate) fn init(config: &LogConfig) -> Result<()> {
    let stdout = match config.stdout {
        true => Some(Mutex::new(StandardStream::stdout(ColorChoice::Auto))),
        false => None,
    };

    let file = config.file.as_ref()
        .map(|path| {
            OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .context(format!("failed to open/create log file '{}'", path.display()))
        })
        .transpose()?
        .map(Mutex::new);

    let logger = Logger {
        level_filter: config.level,
        file,
        stdout,
    };

    log::set_boxed_logger(Box::new(logger)).context("`logger::init` called twice")?;
    log::set_max_level(config.level);

    Ok(())
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("quill")
            && metadata.level() <= self.level_filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if let Some(stdout) = &self.stdout {
            // We ignore a poisoned mutex: the stdout handle doesn't contain
            // any state that other threads could have tainted. We also ignore
            // errors writing to stdout, as it's better the server keeps
            // running without logs than the server going down.
            let mut stdout = stdout.lock().unwrap_or_else(|e| e.into_inner());
            let _ = write(record, &mut *stdout);
        }

        if let Some(file) = &self.file {
            // See comment above about stdout.
            let mut file = file.lock().unwrap_or_else(|e| e.into_inner());
            let _ = write(record, &mut NoColor::new(&mut *file));
        }
    }

    fn flush(&self) {}
}

fn write(record: &Record, out: &mut impl WriteColor) -> Result<()> {
    let level_color = match record.level() {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug => Color::Blue,
        Level::Trace => Color::Magenta,
    };
    let mut level_style = ColorSpec::new();
    level_style.set_fg(Some(level_color));
    level_style.set_bold(record.level() <= Level::Warn);

    let mut dim_style = ColorSpec::new();
    dim_style.set_dimmed(true);

    let mut body_style = ColorSpec::new();
    match record.level() {
        Level::Error => { body_style.set_fg(Some(Color::Red)); }
        Level::Warn => { body_style.set_fg(Some(Color::Yellow)); }
        Level::Trace => { body_style.set_dimmed(true); }
        _ => {}
    }

    // Print time, level and target.
    out.set_color(&dim_style)?;
    write!(out, "{} ", chrono::Local::now().format("%Y-%m-%d %H:%M:%S.%3f"))?;
    out.set_color(&level_style)?;
    write!(out, "{:5}", record.level())?;
    out.set_color(&dim_style)?;
    write!(out, " {} > ", record.target())?;

    // Print the actual message.
    out.set_color(&body_style)?;
    write!(out, " {}", record.args())?;
    out.reset()?;
    writeln!(out)?;

    Ok(())
}
