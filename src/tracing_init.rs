//! Tracing subscriber setup shared by the command-line tools.

use std::env;
use std::io::IsTerminal;

use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::TracingConfig;

const EVENT_FILTER_ENV_VAR: &str = "RUST_LOG";
const TOOL_TARGETS: &[&str] = &[
    "s3kit",
    "s3keycheck",
    "s3inventory",
    "s3deletemarkers",
    "filenormie",
    "populate",
];
const AWS_SDK_TARGETS: &[&str] = &["aws_smithy_runtime", "aws_config", "aws_sigv4"];

fn directives<'a>(targets: impl Iterator<Item = &'a &'a str>, level: log::Level) -> String {
    targets
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber.
///
/// Logs go to stderr so that reports and tables printed on stdout stay
/// machine-readable. `RUST_LOG` overrides the level unless AWS SDK tracing
/// is requested.
pub fn init_tracing(config: &TracingConfig) {
    let fmt_span = if config.span_events_tracing {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .compact()
        .with_target(false)
        .with_ansi(!config.disable_color_tracing && std::io::stderr().is_terminal())
        .with_span_events(fmt_span);

    let mut show_target = true;
    let tracing_level = config.tracing_level;
    let event_filter = if config.aws_sdk_tracing {
        directives(TOOL_TARGETS.iter().chain(AWS_SDK_TARGETS), tracing_level)
    } else if let Ok(filter) = env::var(EVENT_FILTER_ENV_VAR) {
        filter
    } else {
        show_target = false;
        directives(TOOL_TARGETS.iter(), tracing_level)
    };

    let subscriber_builder = subscriber_builder
        .with_env_filter(event_filter)
        .with_target(show_target);
    if config.json_tracing {
        subscriber_builder.json().init();
    } else {
        subscriber_builder.init();
    }
}
