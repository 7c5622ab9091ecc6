use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use dcr_viz::graph::RelationKind;
use dcr_viz::{DcrGraph, DcrTemplate, RenderOptions, TimePrecision};
use log::{LevelFilter, debug, info};
use std::io::Write;
use std::process::{Command, Stdio};
use std::str::FromStr;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "dcr-viz")]
#[command(about = "DCR graph visualizer", long_about = None)]
struct Cli {
    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, global = true, env = "DCR_VIZ_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a graph template to DOT, or to an image through Graphviz `dot`.
    Render {
        #[arg(long)]
        template: String,

        #[arg(short = 'o', long)]
        out: String,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Print structural statistics of a graph template.
    Info {
        #[arg(long)]
        template: String,
    },
}

#[derive(Args, Debug)]
struct StyleArgs {
    /// Output format: `dot` writes the DOT text, anything else is passed to `dot -T`
    /// (`html` as `plain-text`).
    #[arg(long, env = "DCR_VIZ_FORMAT", default_value = "png")]
    format: String,

    #[arg(long, env = "DCR_VIZ_RANKDIR", default_value = "LR")]
    rankdir: String,

    #[arg(long, env = "DCR_VIZ_FONT_SIZE", default_value_t = 12)]
    font_size: u32,

    #[arg(long, env = "DCR_VIZ_BGCOLOR", default_value = "white")]
    bgcolor: String,

    /// Draw roles and executed/pending markers on events.
    #[arg(long, env = "DCR_VIZ_DECORATIONS", default_value_t = true, action = clap::ArgAction::Set)]
    decorations: bool,

    /// Smallest unit on timed edges (D, H, M or S).
    #[arg(long, env = "DCR_VIZ_TIME_PRECISION", default_value = "D")]
    time_precision: TimePrecision,
}

impl From<StyleArgs> for RenderOptions {
    fn from(args: StyleArgs) -> Self {
        RenderOptions {
            format: args.format,
            rankdir: args.rankdir,
            font_size: args.font_size,
            bgcolor: args.bgcolor,
            decorations: args.decorations,
            time_precision: args.time_precision,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    match cli.cmd {
        Commands::Render {
            template,
            out,
            style,
        } => {
            debug!(style:?; "Parsed style arguments");

            // 1) Load + validate the template.
            let graph = load_graph(&template)?;

            // 2) Build DOT.
            let options = RenderOptions::from(style);
            let dot = dcr_viz::render::render_dot(&graph, &options)
                .with_context(|| format!("render {}", template))?;

            // 3) Write text, or hand it to Graphviz.
            write_output(&dot, &options.format, &out)?;
            info!(out = out.as_str(), format = options.format.as_str(); "Diagram written");
            println!("Wrote {}", out);
        }
        Commands::Info { template } => {
            let graph = load_graph(&template)?;
            print_info(&graph);
        }
    }

    Ok(())
}

fn load_graph(path: &str) -> Result<DcrGraph> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read template file {}", path))?;
    let template =
        DcrTemplate::from_json(&text).with_context(|| format!("parse template {}", path))?;
    Ok(DcrGraph::from_template(&template))
}

fn write_output(dot: &str, format: &str, out: &str) -> Result<()> {
    if matches!(format, "dot" | "gv") {
        std::fs::write(out, dot).with_context(|| format!("write {}", out))?;
        return Ok(());
    }

    let format = graphviz_format(format);
    let mut child = Command::new("dot")
        .arg(format!("-T{}", format))
        .arg("-o")
        .arg(out)
        .stdin(Stdio::piped())
        .spawn()
        .context("spawn Graphviz `dot` (is Graphviz installed?)")?;

    child
        .stdin
        .take()
        .context("open stdin of `dot`")?
        .write_all(dot.as_bytes())
        .context("pipe DOT into `dot`")?;

    let status = child.wait().context("wait for `dot`")?;
    if !status.success() {
        bail!("`dot -T{}` exited with {}", format, status);
    }
    Ok(())
}

/// Graphviz output type for a requested format. `html` is written as plain text.
fn graphviz_format(format: &str) -> String {
    format.replace("html", "plain-text")
}

fn print_info(graph: &DcrGraph) {
    let marking = graph.marking();
    println!("events:      {}", graph.events().len());
    println!("activities:  {}", graph.labels().len());
    println!("constraints: {}", graph.get_constraints());
    for kind in RelationKind::ALL {
        if graph.relations().get(kind).is_some() {
            println!("  {:<11} {}", kind.to_string(), graph.relations().target_count(kind));
        }
    }
    println!(
        "marking:     {} executed, {} included, {} pending",
        marking.executed().len(),
        marking.included().len(),
        marking.pending().len()
    );
    let groups = graph.groups();
    if !groups.is_empty() {
        println!("groups:      {} ({} top-level)", groups.len(), groups.roots().len());
    }
    if !graph.role_assignments().is_empty() {
        println!("roles:       {}", graph.role_assignments().len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_is_rendered_as_plain_text() {
        assert_eq!(graphviz_format("html"), "plain-text");
        assert_eq!(graphviz_format("svg"), "svg");
        assert_eq!(graphviz_format("png"), "png");
    }
}
