//! Process-wide logger: stdout plus an optional append-only file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};

/// Copies every record to stdout and, when configured, to a file.
///
/// env_logger hands over one fully formatted record per `write` call, so
/// lines from concurrent requests never interleave.
pub struct TeeWriter {
    file: Option<File>,
}

impl TeeWriter {
    pub fn new(file: Option<File>) -> Self {
        Self { file }
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

pub fn level_for(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    }
}

/// Install the global logger. `RUST_LOG` overrides the `-v` level.
pub fn init(verbose: u8, log_file: Option<&Path>) -> Result<()> {
    let file = log_file
        .map(|path| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))
        })
        .transpose()?;

    Builder::new()
        .filter_level(level_for(verbose))
        .parse_env(Env::default())
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                buf.timestamp(),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(TeeWriter::new(file))))
        .try_init()
        .context("Failed to initialize logger")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Seek};

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0), log::LevelFilter::Warn);
        assert_eq!(level_for(1), log::LevelFilter::Info);
        assert_eq!(level_for(5), log::LevelFilter::Debug);
    }

    #[test]
    fn test_tee_writes_whole_records_to_file() {
        let path = std::env::temp_dir().join(format!("fitsize-tee-{}.log", std::process::id()));
        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .read(true)
            .write(true)
            .open(&path)
            .unwrap();

        let mut tee = TeeWriter::new(Some(file.try_clone().unwrap()));
        tee.write_all(b"one - INFO - first\n").unwrap();
        tee.write_all(b"two - INFO - second\n").unwrap();
        tee.flush().unwrap();

        let mut contents = String::new();
        let mut file = file;
        file.rewind().unwrap();
        file.read_to_string(&mut contents).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(contents, "one - INFO - first\ntwo - INFO - second\n");
    }
}
