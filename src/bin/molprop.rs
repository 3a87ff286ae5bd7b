use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use camino::Utf8PathBuf;
use chrono::Utc;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use molprop_extractor::app::{App, RunStatus};
use molprop_extractor::catalog::{PropertyCatalog, PropertySelection};
use molprop_extractor::config::ConfigLoader;
use molprop_extractor::error::MolpropError;
use molprop_extractor::input::open_molecules;
use molprop_extractor::interrupt::{
    AbortPrompt, AbortSignal, QuitImmediately, TerminalAbortPrompt,
};
use molprop_extractor::output::{JsonOutput, OutputMode, RunSummary};
use molprop_extractor::prompt;
use molprop_extractor::pubchem::PubchemHttpClient;
use molprop_extractor::report::ReportWriter;
use molprop_extractor::stats::StatsReport;
use molprop_extractor::style::{YELLOW, paint};

const ABORT_EXIT_CODE: u8 = 130;

#[derive(Parser)]
#[command(name = "molprop")]
#[command(about = "Resolve SMILES against PubChem and report cross-database ids and properties")]
#[command(version, author)]
struct Cli {
    /// Molecule file, one SMILES per line with an optional label (.gz accepted)
    #[arg(long, short)]
    input: Option<Utf8PathBuf>,

    /// Comma-separated property numbers or names, or `a` for all
    #[arg(long, short)]
    properties: Option<String>,

    #[arg(long, short)]
    output: Option<Utf8PathBuf>,

    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    non_interactive: bool,

    #[arg(long)]
    json: bool,

    #[arg(long)]
    no_color: bool,

    /// Print the property catalog and exit
    #[arg(long)]
    list_properties: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(RunStatus::Completed) => ExitCode::SUCCESS,
        Ok(RunStatus::Aborted) => ExitCode::from(ABORT_EXIT_CODE),
        Err(report) => {
            eprintln!("{report:?}");
            if let Some(err) = report.downcast_ref::<MolpropError>() {
                return ExitCode::from(map_exit_code(err));
            }
            ExitCode::from(1)
        }
    }
}

fn map_exit_code(error: &MolpropError) -> u8 {
    match error {
        MolpropError::InvalidPropertySelection(_)
        | MolpropError::ConfigRead(_)
        | MolpropError::ConfigParse(_)
        | MolpropError::InputNotFound(_)
        | MolpropError::PromptClosed => 2,
        MolpropError::PubchemHttp(_) | MolpropError::PubchemStatus { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<RunStatus> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let config = ConfigLoader::resolve(cli.config.as_deref())?;
    let color = config.color && !cli.no_color;

    if cli.list_properties {
        for (index, name) in PropertyCatalog::all() {
            println!("{index:>3}  {name}");
        }
        return Ok(RunStatus::Completed);
    }

    if output_mode == OutputMode::Interactive && !cli.json {
        welcome(color);
    }

    let input_path = match cli.input {
        Some(path) => path,
        None if output_mode == OutputMode::Interactive => {
            let mut dialog = dialog_sink(cli.json);
            match prompt::ask_input_path(&mut io::stdin().lock(), &mut dialog, color)? {
                Some(path) => path,
                None => return Ok(RunStatus::Completed),
            }
        }
        None => {
            return Err(miette::Report::msg(
                "--input is required with --non-interactive",
            ));
        }
    };

    let selection = match (cli.properties, config.selection) {
        (Some(text), _) => PropertySelection::parse(&text)?,
        (None, Some(selection)) => selection,
        (None, None) if output_mode == OutputMode::Interactive => {
            let mut dialog = dialog_sink(cli.json);
            prompt::ask_properties(&mut io::stdin().lock(), &mut dialog, color)?
        }
        (None, None) => {
            return Err(miette::Report::msg(
                "--properties is required with --non-interactive",
            ));
        }
    };

    let output_path = cli.output.unwrap_or(config.output);
    let molecules = open_molecules(&input_path)?;
    let file = File::create(&output_path)
        .map_err(|err| MolpropError::ReportWrite(format!("{output_path}: {err}")))?;
    let display: Box<dyn Write> = if cli.json {
        Box::new(io::sink())
    } else {
        Box::new(io::stdout())
    };
    let mut report = ReportWriter::new(BufWriter::new(file), display, color);

    let client =
        PubchemHttpClient::new(&config.pubchem)?.with_conformer(selection.requires_conformer());
    let abort = AbortSignal::new();
    abort.install()?;
    let mut abort_prompt: Box<dyn AbortPrompt> = if output_mode.confirms_abort(cli.json) {
        Box::new(TerminalAbortPrompt::new(color))
    } else {
        Box::new(QuitImmediately)
    };

    let started_at = Utc::now();
    let app = App::new(client);
    let outcome = app.run(
        molecules,
        &selection,
        &mut report,
        &abort,
        abort_prompt.as_mut(),
    )?;
    drop(report);

    if cli.json {
        let summary = RunSummary::new(&outcome, &selection, &output_path, started_at);
        JsonOutput::print_summary(&summary).into_diagnostic()?;
    } else {
        print!("{}", StatsReport::new(outcome.counters).render(color));
        match outcome.status {
            RunStatus::Completed => println!("Report written to {output_path}"),
            RunStatus::Aborted => println!("{}", paint(color, YELLOW, "Aborting program...")),
        }
    }

    Ok(outcome.status)
}

/// Dialog text goes to stderr when stdout carries the JSON summary.
fn dialog_sink(json: bool) -> Box<dyn Write> {
    if json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    }
}

fn welcome(color: bool) {
    let rule = "=".repeat(44);
    let banner = format!("{rule}\n++++++DATABASE ID & PROPERTY EXTRACTOR++++++\n{rule}");
    println!("\n{}\n", paint(color, YELLOW, &banner));
}
