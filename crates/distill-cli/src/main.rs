use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use distill_core::{simplify_design, CollapseStyle, SimplifyOptions};
use distill_data::model::DesignResponse;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Simplify a design document into compact JSON", long_about = None)]
struct Cli {
    /// Raw file or nodes response (JSON). Reads stdin when omitted.
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,

    /// Maximum descent depth (roots are depth 0)
    #[arg(long)]
    depth: Option<usize>,

    /// Shape of collapsed vector parents
    #[arg(long, value_enum, default_value_t = Collapse::ImageFill)]
    collapse: Collapse,

    /// Prefix of synthesized image URLs
    #[arg(long, default_value = "images/")]
    image_prefix: String,

    /// Keep absolute bounding boxes on nodes
    #[arg(long)]
    bounding_box: bool,

    /// Seed for variable ids
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Collapse {
    Stub,
    ImageFill,
}

impl From<Collapse> for CollapseStyle {
    fn from(value: Collapse) -> Self {
        match value {
            Collapse::Stub => CollapseStyle::Stub,
            Collapse::ImageFill => CollapseStyle::ImageFill,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

impl Cli {
    fn options(&self) -> SimplifyOptions {
        SimplifyOptions {
            max_depth: self.depth,
            collapse: self.collapse.into(),
            image_url_prefix: self.image_prefix.clone(),
            include_bounding_box: self.bounding_box,
            id_seed: self.seed,
        }
    }
}

fn init_logging(level: LogLevel, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.to_string().parse().context("invalid log level")?)
        .from_env_lossy();

    // stdout carries the document, logs go to stderr
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))
}

/// Parses a raw response and renders its simplified form.
fn simplify_str(raw: &str, options: &SimplifyOptions, pretty: bool) -> Result<String> {
    let response =
        DesignResponse::from_json_str(raw).context("input is not a valid file or nodes response")?;
    let design = simplify_design(&response, options)?;
    info!(
        name = %design.name,
        roots = design.nodes.len(),
        variables = design.global_vars.styles.len(),
        vector_groups = design.global_vars.children_to_parents.len(),
        "simplified design"
    );
    Ok(design.to_json_string(pretty)?)
}

fn run(cli: &Cli) -> Result<()> {
    let raw = match &cli.input {
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
            buf
        }
    };

    let output = simplify_str(&raw, &cli.options(), cli.pretty)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("failed to write {:?}", path))?;
            info!("Output: {:?}", path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", output).context("failed to write stdout")?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_level, cli.log_format) {
        eprintln!("{:#}", e);
    }

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::ffi::OsStr;

    fn sample() -> String {
        json!({
            "name": "Sample",
            "lastModified": "2024-01-01T00:00:00Z",
            "document": {
                "id": "0:0",
                "type": "DOCUMENT",
                "children": [{
                    "id": "1:1",
                    "name": "Logo",
                    "type": "FRAME",
                    "absoluteBoundingBox": { "x": 0, "y": 0, "width": 24, "height": 24 },
                    "children": [{ "id": "1:2", "type": "VECTOR",
                                   "fills": [{ "type": "SOLID", "color": { "r": 0, "g": 0, "b": 0, "a": 1 } }] }]
                }]
            }
        })
        .to_string()
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["distill"]);
        assert!(cli.input.is_none());
        assert_eq!(cli.options(), SimplifyOptions::default());
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_cli_flags_map_to_options() {
        let cli = Cli::parse_from([
            "distill",
            "in.json",
            "--depth",
            "2",
            "--collapse",
            "stub",
            "--image-prefix",
            "assets/",
            "--bounding-box",
            "--seed",
            "7",
        ]);
        let options = cli.options();
        assert_eq!(cli.input, Some(PathBuf::from("in.json")));
        assert_eq!(options.max_depth, Some(2));
        assert_eq!(options.collapse, CollapseStyle::Stub);
        assert_eq!(options.image_url_prefix, "assets/");
        assert!(options.include_bounding_box);
        assert_eq!(options.id_seed, 7);
    }

    #[test]
    fn test_run_file_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("file.json");
        let output = dir.path().join("out.json");
        fs::write(&input, sample()).unwrap();

        let cli = Cli::parse_from([
            OsStr::new("distill"),
            input.as_os_str(),
            OsStr::new("--output"),
            output.as_os_str(),
            OsStr::new("--image-prefix"),
            OsStr::new("assets/"),
        ]);
        run(&cli).unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(value["name"], "Sample");
        assert_eq!(value["nodes"][0]["type"], "IMAGE");
        let url = value["nodes"][0]["fills"][0]["imageRef"].as_str().unwrap();
        assert!(url.starts_with("assets/vector_"));
        assert!(url.ends_with(".png"));
    }

    #[test]
    fn test_pretty_output_is_same_document() {
        let options = SimplifyOptions::default();
        let compact = simplify_str(&sample(), &options, false).unwrap();
        let pretty = simplify_str(&sample(), &options, true).unwrap();
        assert!(pretty.contains('\n'));
        assert!(!compact.contains('\n'));
        let a: Value = serde_json::from_str(&compact).unwrap();
        let b: Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let cli = Cli::parse_from([OsStr::new("distill"), missing.as_os_str()]);
        let err = run(&cli).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to read"));
    }

    #[test]
    fn test_deeply_nested_input_is_accepted() {
        let mut node = json!({ "id": "leaf", "type": "RECTANGLE" });
        for i in (0..100).rev() {
            node = json!({ "id": format!("g{}", i), "type": "GROUP", "children": [node] });
        }
        let raw = json!({
            "name": "Deep",
            "lastModified": "2024-01-01T00:00:00Z",
            "document": { "id": "0:0", "type": "DOCUMENT", "children": [node] }
        })
        .to_string();

        let options = SimplifyOptions { max_depth: Some(3), ..Default::default() };
        let value: Value = serde_json::from_str(&simplify_str(&raw, &options, false).unwrap()).unwrap();
        assert_eq!(value["nodes"][0]["id"], "g0");
        assert_eq!(value["nodes"][0]["children"][0]["children"][0]["children"][0]["id"], "g3");
        assert!(value["nodes"][0]["children"][0]["children"][0]["children"][0].get("children").is_none());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = simplify_str("{ not json", &SimplifyOptions::default(), false).unwrap_err();
        assert!(err.to_string().contains("not a valid"));
    }

    #[test]
    fn test_unknown_paint_surfaces_node_id() {
        let raw = json!({
            "name": "Bad",
            "lastModified": "2024-01-01T00:00:00Z",
            "document": { "id": "0:0", "type": "DOCUMENT", "children": [
                { "id": "9:9", "type": "RECTANGLE", "fills": [{ "type": "PATTERN" }] }
            ] }
        })
        .to_string();
        let err = simplify_str(&raw, &SimplifyOptions::default(), false).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("9:9"));
    }
}
