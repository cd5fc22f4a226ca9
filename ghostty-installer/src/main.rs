use std::io::Write;
use std::panic;

use clap::Parser;
use cli::{Cli, OutputFormat};
use console::Term;
use ghostty_installer::do_install;
use ghostty_installer_schema::RunReport;
use miette::{Diagnostic, IntoDiagnostic};
use thiserror::Error;
use tracing::error;

mod cli;

/// A panic, dressed up so it renders like any other error
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
struct PanicError {
    message: String,
    #[help]
    location: Option<String>,
}

/// Show a fatal error the way the user asked for output
///
/// Humans get miette's rendering on stderr. JSON consumers get
/// `{"error": ...}` on stdout, next to where a report would have gone.
fn report_error(format: OutputFormat, error: &miette::Report) {
    match format {
        OutputFormat::Human => error!("{:?}", error),
        OutputFormat::Json => {
            let mut rendered = String::new();
            if miette::JSONReportHandler::new()
                .render_report(&mut rendered, error.as_ref())
                .is_err()
            {
                rendered = serde_json::Value::String(error.to_string()).to_string();
            }
            let _ = writeln!(&mut Term::stdout(), r#"{{"error": {rendered}}}"#);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let format = cli.output_format;

    tracing_subscriber::fmt::fmt()
        .with_max_level(cli.verbose)
        .with_target(false)
        .without_time()
        .with_ansi(console::colors_enabled_stderr())
        .with_writer(std::io::stderr)
        .init();

    miette::set_hook(Box::new(|_| {
        let theme = if console::colors_enabled_stderr() {
            miette::GraphicalTheme::unicode()
        } else {
            miette::GraphicalTheme::unicode_nocolor()
        };
        Box::new(miette::MietteHandlerOpts::new().graphical_theme(theme).build())
    }))
    .expect("failed to initialize error handler");

    panic::set_hook(Box::new(move |info| {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("something went wrong");
        let panic = PanicError {
            message: message.to_owned(),
            location: info
                .location()
                .map(|loc| format!("at {}:{}:{}", loc.file(), loc.line(), loc.column())),
        };
        report_error(
            format,
            &miette::Report::from(panic).wrap_err("ghostty-installer panicked"),
        );
    }));

    if let Err(e) = real_main(&cli) {
        report_error(format, &e);
        std::process::exit(-1);
    }
}

fn real_main(cli: &Cli) -> Result<(), miette::Report> {
    let report = do_install(&cli.to_config())?;

    // Human output is the progress log on stderr, nothing more
    if cli.output_format == OutputFormat::Json {
        print_json(&mut Term::stdout(), &report).into_diagnostic()?;
    }
    Ok(())
}

fn print_json(out: &mut Term, report: &RunReport) -> Result<(), std::io::Error> {
    let string = serde_json::to_string_pretty(report)?;
    writeln!(out, "{string}")?;
    Ok(())
}
