use std::fmt::Write;

use jiff::{Timestamp, Zoned, tz::TimeZone};
use log::{Level, Record};
use logforth::{append::Stdout, diagnostic::Diagnostic, layout::Layout};
use serde::Serialize;

use crate::args::{Args, LogStyle};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// `<timestamp> <LEVEL> [<service>]  <message>`, optionally with a colored level.
#[derive(Debug, Clone)]
struct ServiceTextLayout {
    service: &'static str,
    color: bool,
}

impl ServiceTextLayout {
    fn new(service: &'static str, color: bool) -> Self {
        Self { service, color }
    }

    fn line(&self, now: &Zoned, record: &Record<'_>) -> Result<String, std::fmt::Error> {
        let mut output = String::new();

        write!(output, "{} ", now.strftime(TIMESTAMP_FORMAT))?;

        if self.color {
            write!(output, "\x1b[{}m{:>5}\x1b[0m", level_color(record.level()), record.level())?;
        } else {
            write!(output, "{:>5}", record.level())?;
        }

        write!(output, " [{}]  {}", self.service, record.args())?;

        Ok(output)
    }
}

fn level_color(level: Level) -> u8 {
    match level {
        Level::Error => 31,
        Level::Warn => 33,
        Level::Info => 32,
        Level::Debug => 34,
        Level::Trace => 35,
    }
}

impl Layout for ServiceTextLayout {
    fn format(&self, record: &Record<'_>, _diagnostics: &[Box<dyn Diagnostic>]) -> anyhow::Result<Vec<u8>> {
        let now = Zoned::now().with_time_zone(TimeZone::UTC);

        Ok(self.line(&now, record)?.into_bytes())
    }
}

/// One JSON object per line, tagged with the service.
#[derive(Debug, Clone)]
struct ServiceJsonLayout {
    service: &'static str,
}

#[derive(Debug, Serialize)]
struct JsonLine<'a> {
    timestamp: String,
    level: &'a str,
    service: &'a str,
    target: &'a str,
    message: String,
}

impl ServiceJsonLayout {
    fn line(&self, timestamp: Timestamp, record: &Record<'_>) -> anyhow::Result<String> {
        let line = JsonLine {
            timestamp: timestamp.strftime(TIMESTAMP_FORMAT).to_string(),
            level: record.level().as_str(),
            service: self.service,
            target: record.target(),
            message: record.args().to_string(),
        };

        Ok(serde_json::to_string(&line)?)
    }
}

impl Layout for ServiceJsonLayout {
    fn format(&self, record: &Record<'_>, _diagnostics: &[Box<dyn Diagnostic>]) -> anyhow::Result<Vec<u8>> {
        Ok(self.line(Timestamp::now(), record)?.into_bytes())
    }
}

pub(super) fn init(args: &Args) {
    let service = args.command.service_name();

    logforth::builder()
        .dispatch(|d| {
            let d = d.filter(args.log_level.env_filter());

            match args.log_style {
                LogStyle::Color => d.append(Stdout::default().with_layout(ServiceTextLayout::new(service, true))),
                LogStyle::Text => d.append(Stdout::default().with_layout(ServiceTextLayout::new(service, false))),
                LogStyle::Json => d.append(Stdout::default().with_layout(ServiceJsonLayout { service })),
            }
        })
        .apply();
}
