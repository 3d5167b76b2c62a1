use callouts_core::{CalloutSettings, ParsedCalloutNode, ResolvedCallout, SpriteIconRegistry};
use callouts_render::render_callout;
use serde::Serialize;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Callouts(callouts_core::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Callouts(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<callouts_core::Error> for CliError {
    fn from(value: callouts_core::Error) -> Self {
        Self::Callouts(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Render,
    Resolve,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    settings: Option<String>,
    input: Option<String>,
    pretty: bool,
    out: Option<String>,
}

#[derive(Serialize)]
struct ResolveOut<'a> {
    resolved: &'a ResolvedCallout,
    icon_html: Option<String>,
}

fn usage() -> &'static str {
    "callouts-cli\n\
\n\
USAGE:\n\
  callouts-cli [render] --settings <path> [--out <path>] [<node.json>|-]\n\
  callouts-cli resolve --settings <path> [--pretty] [<node.json>|-]\n\
\n\
NOTES:\n\
  - If <node.json> is omitted or '-', the parsed callout node is read from stdin.\n\
  - Settings files ending in .yml/.yaml are read as YAML, anything else as JSON.\n\
  - render prints HTML to stdout by default; use --out to write a file.\n\
  - Set RUST_LOG (e.g. RUST_LOG=callouts_core=debug) to see resolution diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "resolve" => args.command = Command::Resolve,
            "--pretty" => args.pretty = true,
            "--settings" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.settings = Some(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
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
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if args.settings.is_none() {
        return Err(CliError::Usage(usage()));
    }

    Ok(args)
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

fn load_settings(path: &str) -> Result<CalloutSettings, CliError> {
    let text = std::fs::read_to_string(path)?;
    let lower = path.to_ascii_lowercase();
    let settings = if lower.ends_with(".yml") || lower.ends_with(".yaml") {
        CalloutSettings::from_yaml_str(&text)?
    } else {
        CalloutSettings::from_json_str(&text)?
    };
    tracing::debug!(
        path,
        definitions = settings.index().len(),
        "loaded callout settings"
    );
    Ok(settings)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let settings = load_settings(args.settings.as_deref().unwrap_or_default())?;
    let node = ParsedCalloutNode::from_json_str(&read_input(args.input.as_deref())?)?;

    match args.command {
        Command::Resolve => {
            let resolved = settings.resolve(&node);
            let icon_html = resolved.icon_markup(&SpriteIconRegistry);
            write_json(
                &ResolveOut {
                    resolved: &resolved,
                    icon_html,
                },
                args.pretty,
            )
        }
        Command::Render => {
            let html = render_callout(node, &settings, &SpriteIconRegistry);
            write_text(&html, args.out.as_deref())
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let argv = std::env::args().collect::<Vec<_>>();
    let args = match parse_args(&argv) {
        Ok(a) => a,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
