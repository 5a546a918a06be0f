use std::process::ExitCode;

use clap::{Parser, Subcommand};
use duration_fns::duration::format_number;
use duration_fns::{Duration, Instant, TimeInput, Unit};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duration-fns", version, about = "Duration arithmetic from the command line")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the canonical form of a duration
    Parse {
        /// Duration text, e.g. "1h 30m", "P1DT2H" or a number of milliseconds
        #[arg(allow_hyphen_values = true)]
        time: String,
    },
    /// Convert a duration to a single unit
    Convert {
        #[arg(allow_hyphen_values = true)]
        time: String,

        /// Target unit
        #[arg(short, long, default_value = "milliseconds")]
        to: Unit,

        /// Measure months and years from this date instead of using mean lengths
        #[arg(short, long, allow_hyphen_values = true)]
        from: Option<String>,
    },
    /// Shift a date by a duration
    Apply {
        /// ISO 8601, RFC 3339 or RFC 2822 date
        #[arg(allow_hyphen_values = true)]
        date: String,

        #[arg(allow_hyphen_values = true)]
        time: String,
    },
    /// Flip a duration's sign if its net effect is negative
    Abs {
        #[arg(allow_hyphen_values = true)]
        time: String,
    },
}

fn render_duration(d: &Duration, json: bool) -> String {
    if json {
        json!({ "iso": d.to_string(), "duration": d }).to_string()
    } else {
        let fields: Vec<String> = d
            .fields()
            .rev()
            .filter(|(_, v)| *v != 0.0)
            .map(|(unit, v)| format!("{}: {}", unit, format_number(v)))
            .collect();
        if fields.is_empty() {
            d.to_string()
        } else {
            format!("{} ({})", d, fields.join(", "))
        }
    }
}

fn render_instant(i: &Instant, json: bool) -> String {
    if json {
        json!({ "instant": i.to_string(), "epoch_millis": i.epoch_millis() }).to_string()
    } else {
        i.to_string()
    }
}

fn run(command: Command, json: bool) -> duration_fns::Result<String> {
    match command {
        Command::Parse { time } => {
            let d = duration_fns::parse(TimeInput::Text(time))?;
            Ok(render_duration(&d, json))
        }
        Command::Convert { time, to, from } => {
            let time = TimeInput::Text(time);
            let value = match from {
                Some(date) => duration_fns::to_unit_at(to, time, date)?,
                None => duration_fns::to_unit(to, time)?,
            };
            if json {
                Ok(json!({ "unit": to, "value": value }).to_string())
            } else {
                Ok(format_number(value))
            }
        }
        Command::Apply { date, time } => {
            let end = duration_fns::apply(date, TimeInput::Text(time))?;
            Ok(render_instant(&end, json))
        }
        Command::Abs { time } => {
            let d = duration_fns::abs(TimeInput::Text(time))?;
            Ok(render_duration(&d, json))
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(cli.command, cli.json) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}
