use planscope::render::{HeadlessAnalyzer, HeadlessError, HeadlessHost, ViewSynchronizer, size};
use planscope::{Analysis, ApplyRequest, Config};
use planscope_render::view::MatchStrategy;
use planscope_render::{ElementId, ResourceDetail, ViewTransform, render_risk_report};
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Analysis(planscope::Error),
    Render(planscope_render::Error),
    Json(serde_json::Error),
    NoVisual,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Analysis(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::NoVisual => write!(
                f,
                "No rendered visual: pass --svg <path> or embed `_server_svg` in the payload"
            ),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<planscope::Error> for CliError {
    fn from(value: planscope::Error) -> Self {
        Self::Analysis(value)
    }
}

impl From<planscope_render::Error> for CliError {
    fn from(value: planscope_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        match value {
            HeadlessError::Parse(err) => Self::Analysis(err),
            HeadlessError::Render(err) => Self::Render(err),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Analyze,
    Report,
    Diagram,
    Layout,
    Apply,
    View,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    pretty: bool,
    plan_id: Option<String>,
    auto_approve: bool,
    svg: Option<String>,
    viewport_width: f64,
    viewport_height: f64,
    select: Vec<String>,
    out: Option<String>,
}

#[derive(Serialize)]
struct MatchOut<'a> {
    element: ElementId,
    dom_id: Option<&'a str>,
    address: &'a str,
    strategy: MatchStrategy,
}

#[derive(Serialize)]
struct ViewOut<'a> {
    view_box: [f64; 4],
    viewport: [f64; 2],
    transform: ViewTransform,
    zoom_percent: u32,
    matches: Vec<MatchOut<'a>>,
    unmatched: usize,
    selected: Option<&'a str>,
    detail: Option<ResourceDetail>,
}

fn usage() -> &'static str {
    "planscope\n\
\n\
USAGE:\n\
  planscope [analyze] [--config <path>] [--out <path>] [<path>|-]\n\
  planscope report [--config <path>] [--out <path>] [<path>|-]\n\
  planscope diagram [--config <path>] [--out <path>] [<path>|-]\n\
  planscope layout [--config <path>] [--pretty] [--out <path>] [<path>|-]\n\
  planscope apply [--config <path>] [--plan-id <id>] [--auto-approve] [--out <path>] [<path>|-]\n\
  planscope view [--config <path>] [--svg <path>] [--viewport-width <w>] [--viewport-height <h>] [--select <address>]... [--pretty] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a Terraform plan JSON document, or an architecture payload with \"_mode\": \"architecture\".\n\
  - apply analyzes the input first and only simulates; nothing is ever executed.\n\
  - view attaches to --svg (or the payload's `_server_svg`) and prints the synchronized state as JSON.\n\
  - Set PLANSCOPE_LOG (e.g. `debug`) to control diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        viewport_width: 800.0,
        viewport_height: 600.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "analyze" => args.command = Command::Analyze,
            "report" => args.command = Command::Report,
            "diagram" => args.command = Command::Diagram,
            "layout" => args.command = Command::Layout,
            "apply" => args.command = Command::Apply,
            "view" => args.command = Command::View,
            "--pretty" => args.pretty = true,
            "--auto-approve" => args.auto_approve = true,
            "--config" => args.config = Some(value(&mut it)?.to_string()),
            "--plan-id" => args.plan_id = Some(value(&mut it)?.to_string()),
            "--svg" => args.svg = Some(value(&mut it)?.to_string()),
            "--select" => args.select.push(value(&mut it)?.to_string()),
            "--out" => args.out = Some(value(&mut it)?.to_string()),
            "--viewport-width" => args.viewport_width = dimension(value(&mut it)?)?,
            "--viewport-height" => args.viewport_height = dimension(value(&mut it)?)?,
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a str, CliError> {
    it.next()
        .map(String::as_str)
        .ok_or(CliError::Usage(usage()))
}

fn dimension(raw: &str) -> Result<f64, CliError> {
    let v = raw.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !(v.is_finite() && v > 0.0) {
        return Err(CliError::Usage(usage()));
    }
    Ok(v)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_config(path: Option<&str>) -> Result<Config, CliError> {
    match path {
        None => Ok(Config::default()),
        Some(path) => Ok(Config::from_json_str(&std::fs::read_to_string(path)?)?),
    }
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            println!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, format!("{text}\n"))?;
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PLANSCOPE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn view_json(args: &Args, analysis: &Analysis, config: &Config) -> Result<String, CliError> {
    let markup = match args.svg.as_deref() {
        Some(path) => std::fs::read_to_string(path)?,
        None => analysis
            .server_svg()
            .map(str::to_string)
            .ok_or(CliError::NoVisual)?,
    };

    let mut sync = ViewSynchronizer::new(
        HeadlessHost::new(),
        config.view.clone(),
        size(args.viewport_width, args.viewport_height),
    );
    sync.attach(&markup, &analysis.model.items)?;
    for address in &args.select {
        if !sync.index().is_some_and(|i| i.contains_address(address)) {
            tracing::warn!(%address, "address has no matching element; selection ignored");
        }
        sync.select(address);
    }

    let (Some(visual), Some(index)) = (sync.visual(), sync.index()) else {
        return Err(CliError::NoVisual);
    };
    let matches = index
        .interactive_elements()
        .into_iter()
        .filter_map(|element| {
            Some(MatchOut {
                element,
                dom_id: visual.element(element)?.dom_id.as_deref(),
                address: index.address_for(element)?,
                strategy: index.strategy_for(element)?,
            })
        })
        .collect::<Vec<_>>();
    let vb = visual.view_box();
    let viewport = sync.viewport();
    let out = ViewOut {
        view_box: [vb.origin.x, vb.origin.y, vb.size.width, vb.size.height],
        viewport: [viewport.width, viewport.height],
        transform: sync.transform(),
        zoom_percent: sync.transform().zoom_percent(),
        unmatched: visual.elements().len() - matches.len(),
        matches,
        selected: sync.selected_address(),
        detail: sync.selected_item().map(ResourceDetail::for_item),
    };
    Ok(if args.pretty {
        serde_json::to_string_pretty(&out)?
    } else {
        serde_json::to_string(&out)?
    })
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let text = read_input(args.input.as_deref())?;
    let mut analyzer = HeadlessAnalyzer::new(config.clone());

    let output = match args.command {
        Command::Analyze => analyzer.report(&text)?,
        Command::Report => {
            let analysis = analyzer.analyze(&text)?;
            render_risk_report(analysis, &analysis.risk)
        }
        Command::Diagram => analyzer.diagram(&text)?,
        Command::Layout => analyzer.layout(&text)?.to_json(args.pretty)?,
        Command::Apply => {
            analyzer.analyze(&text)?;
            analyzer.apply(&ApplyRequest {
                plan_id: args.plan_id.clone(),
                auto_approve: args.auto_approve,
            })?
        }
        Command::View => {
            let analysis = analyzer.analyze(&text)?;
            view_json(&args, analysis, &config)?
        }
    };

    write_text(&output, args.out.as_deref())
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_tracing();

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
