use anyhow::Result;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            let fmt_layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_thread_ids(true)
                .with_thread_names(true);

            if let Some(file_path) = &config.file_path {
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(file_path)?;

                registry.with(fmt_layer.with_writer(std::sync::Mutex::new(file))).try_init()?;
            } else {
                registry.with(fmt_layer).try_init()?;
            }
        }
        _ => {
            let fmt_layer = fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_thread_ids(true)
                .with_thread_names(true);

            if let Some(file_path) = &config.file_path {
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(file_path)?;

                registry
                    .with(fmt_layer.with_ansi(false).with_writer(std::sync::Mutex::new(file)))
                    .try_init()?;
            } else {
                registry.with(fmt_layer).try_init()?;
            }
        }
    }

    tracing::info!(
        level = %config.level,
        format = %config.format,
        file = config.file_path.as_deref().unwrap_or("stdout"),
        "Logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_logging_installs_once() {
        let path = std::env::temp_dir().join(format!("matchwise-logging-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let config = LoggingConfig {
            level: "info".to_string(),
            format: "plain".to_string(),
            file_path: Some(path.to_string_lossy().into_owned()),
        };

        init_logging(&config).unwrap();
        tracing::info!(rooms = 3, "Extraction finished");

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Logging initialized"));
        assert!(written.contains("format=plain"));
        assert!(written.contains("Extraction finished"));
        assert!(written.contains("matchwise_utils::logging"));
        assert!(!written.contains('\u{1b}'));

        // the global subscriber is already set
        assert!(init_logging(&config).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
