use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use resxsheet::{FormatType, export_workbook, import_resx};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use resxsheet_cli::path_glob::expand_export_input;
use resxsheet_cli::paths::{EXIT_CONVERSION_FAILED, exit_code, expand_home, preflight};
use resxsheet_cli::report::{RunReport, print_report, to_json};
use resxsheet_cli::watch::watch;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v for debug, -vv for trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print the run report as JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a workbook, or every workbook in a directory, into .resx files.
    Export {
        /// The workbook or directory of workbooks to convert
        #[arg(short, long, env = "RESXSHEET_INPUT")]
        input: String,

        /// The directory the .resx files are written to
        #[arg(short, long, env = "RESXSHEET_OUTPUT")]
        output: String,

        /// Keep running and convert again whenever a workbook changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Collect a .resx file and its locale variants into one workbook sheet.
    Import {
        /// The neutral .resx file, e.g. Resources/Strings.resx
        #[arg(short, long, env = "RESXSHEET_INPUT")]
        input: String,

        /// The directory the workbook is written to
        #[arg(short, long, env = "RESXSHEET_OUTPUT")]
        output: String,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        // Missing-neutral warnings are part of the printed report already.
        0 => "warn,resxsheet::types=error,resxsheet_cli=info",
        1 => "resxsheet=debug,resxsheet_cli=debug",
        _ => "resxsheet=trace,resxsheet_cli=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn fail(error: &resxsheet::Error) -> i32 {
    eprintln!("{} {}", "Error:".red().bold(), error);
    exit_code(error)
}

fn emit(report: &RunReport, json: bool) -> i32 {
    if json {
        match to_json(report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                return EXIT_CONVERSION_FAILED;
            }
        }
    } else {
        print_report(report);
    }

    if report.is_success() {
        0
    } else {
        EXIT_CONVERSION_FAILED
    }
}

fn export_all(inputs: &[PathBuf], output: &Path) -> Result<RunReport, resxsheet::Error> {
    let workbooks = inputs
        .iter()
        .map(|input| export_workbook(input, output))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RunReport::Export { workbooks })
}

fn run_export(input: &Path, output: &Path, watch_mode: bool, json: bool) -> i32 {
    let inputs = match expand_export_input(input) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return EXIT_CONVERSION_FAILED;
        }
    };
    if inputs.is_empty() {
        warn!(path = %input.display(), "no workbooks found");
    }

    let code = match export_all(&inputs, output) {
        Ok(report) => emit(&report, json),
        Err(e) => fail(&e),
    };
    if !watch_mode {
        return code;
    }

    if !json {
        println!("👁️  Watching {} (Ctrl+C to stop)", input.display());
    }
    let result = watch(input, |path| match export_workbook(path, output) {
        Ok(report) => {
            emit(
                &RunReport::Export {
                    workbooks: vec![report],
                },
                json,
            );
        }
        Err(e) => error!(path = %path.display(), error = %e, "export failed"),
    });
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            EXIT_CONVERSION_FAILED
        }
    }
}

fn run_import(input: &Path, output: &Path, json: bool) -> i32 {
    if !FormatType::Resx.matches(input) {
        warn!(path = %input.display(), "input does not have a .resx extension");
    }
    match import_resx(input, output) {
        Ok(report) => emit(&RunReport::Import(report), json),
        Err(e) => fail(&e),
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let code = match args.commands {
        Commands::Export {
            input,
            output,
            watch,
        } => {
            let (input, output) = (expand_home(&input), expand_home(&output));
            match preflight(&input, &output) {
                Ok(()) => run_export(&input, &output, watch, args.json),
                Err(e) => fail(&e),
            }
        }
        Commands::Import { input, output } => {
            let (input, output) = (expand_home(&input), expand_home(&output));
            match preflight(&input, &output) {
                Ok(()) => run_import(&input, &output, args.json),
                Err(e) => fail(&e),
            }
        }
    };

    std::process::exit(code);
}
