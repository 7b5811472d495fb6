use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Install the global subscriber.
///
/// Logs go to stderr so stdout carries the report alone. `COTIZADOR_LOG_FORMAT=json`
/// switches stderr to JSON; `COTIZADOR_LOG_FILE` appends a plain-text copy to
/// that file.
pub fn init_tracing() -> anyhow::Result<()> {
    let log_format = std::env::var("COTIZADOR_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console = if log_format.eq_ignore_ascii_case("json") {
        fmt::layer()
            .json()
            .with_current_span(false)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file = match std::env::var("COTIZADOR_LOG_FILE") {
        Ok(path) if !path.trim().is_empty() => Some(file_layer(Path::new(path.trim()))?),
        _ => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()?;
    Ok(())
}

fn file_layer<S>(path: &Path) -> anyhow::Result<Box<dyn Layer<S> + Send + Sync>>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .boxed())
}

/// Write report lines to `out`, one per line.
pub fn write_report<W: std::io::Write>(out: &mut W, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_report() {
        let mut out = Vec::new();
        write_report(&mut out, &["a".to_string(), String::new(), "b".to_string()]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\n\nb\n");
    }

    #[test]
    fn test_file_layer_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cotizador.log");

        let layer = file_layer::<tracing_subscriber::Registry>(&path);

        assert!(layer.is_ok());
        assert!(path.exists());
    }

    #[test]
    fn test_file_layer_rejects_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("cotizador.log");

        assert!(file_layer::<tracing_subscriber::Registry>(&path).is_err());
    }
}
