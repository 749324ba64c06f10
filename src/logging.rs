use std::fmt::Display;

use anyhow::Result;
use colored::Colorize;
use log::{Level, LevelFilter};

/// Dependencies only get to speak up about problems.
const ALLOWED_EXTERNAL_LEVELS: [Level; 2] = [Level::Warn, Level::Error];

/// Logs go to stderr so command output on stdout stays clean.
pub fn init_logger(verbose: bool) -> Result<()> {
    let local_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let target = Target::from_str(record.target());
            let now = chrono::Local::now();

            out.finish(format_args!(
                "{:^5} {} {:^8} {}",
                level_to_string(&record.level()),
                now.format("%H:%M:%S").to_string().bright_black(),
                target,
                message
            ))
        })
        .filter(move |meta| {
            let target = Target::from_str(meta.target());
            if target.is_local() {
                meta.level() <= local_level
            } else {
                ALLOWED_EXTERNAL_LEVELS.contains(&meta.level())
            }
        })
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}

#[derive(Debug, PartialEq)]
enum Target {
    External(String),
    Local(String),
}

impl Target {
    fn from_str(target: &str) -> Self {
        let mut split = target.split("::");
        let krate = split.next().unwrap_or_default();

        if krate != env!("CARGO_CRATE_NAME") {
            return Target::External(krate.to_string());
        }

        let module = split.next().unwrap_or("main");
        Target::Local(module.to_uppercase())
    }

    fn is_local(&self) -> bool {
        matches!(self, Target::Local(_))
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = match self {
            Target::External(x) => x.as_str().clear(),
            Target::Local(module) => module.as_str().bright_green(),
        };

        Display::fmt(&result, f)
    }
}

fn level_to_string(level: &Level) -> String {
    match level {
        Level::Error => " ERR ".black().on_red().bold().to_string(),
        Level::Warn => " WRN ".black().on_yellow().bold().to_string(),
        Level::Info => " INF ".black().on_blue().bold().to_string(),
        Level::Debug => " DBG ".white().on_black().to_string(),
        Level::Trace => " TRC ".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_classification() {
        assert_eq!(
            Target::from_str("growthlink::jobs"),
            Target::Local("JOBS".to_string())
        );
        assert_eq!(Target::from_str("growthlink"), Target::Local("MAIN".to_string()));
        assert!(!Target::from_str("rusqlite::conn").is_local());
    }
}
