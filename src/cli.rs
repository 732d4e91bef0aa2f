use crate::config::{Config, RootPolicy, load_config};
use crate::generator::parse_generator_response;
use crate::layout::{EdgeStyleTag, NodeSizeClass, Orientation, compute_layout};
use crate::layout_dump::write_layout_dump;
use crate::outline::{render_outline_markdown, render_study_guide};
#[cfg(feature = "png")]
use crate::render::write_output_png;
use crate::render::{render_svg, write_output_svg};
use crate::reconstruct::reconstruct_output;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "pmap",
    version,
    about = "Turn a paper-analysis response into a navigable mind map"
)]
pub struct Args {
    /// Saved generator response (JSON, JSON5 or fenced Markdown) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for text formats if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, layout, root policy)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    #[arg(long = "orientation", value_enum)]
    pub orientation: Option<Orientation>,

    #[arg(long = "size", value_enum)]
    pub size: Option<NodeSizeClass>,

    #[arg(long = "edgeStyle", value_enum)]
    pub edge_style: Option<EdgeStyleTag>,

    #[arg(long = "rootPolicy", value_enum)]
    pub root_policy: Option<RootPolicy>,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
    Outline,
    Markdown,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args);

    let input = read_input(args.input.as_deref())?;
    let response = parse_generator_response(&input)?;
    let tree = reconstruct_output(&response, &config.reconstruct)?;
    log::info!(
        "reconstructed {} nodes under `{}`",
        tree.len(),
        tree.root_node().id
    );

    match args.output_format {
        OutputFormat::Svg => {
            let layout = compute_layout(Some(&tree), &config.layout);
            let svg = render_svg(&layout, &config.theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let layout = compute_layout(Some(&tree), &config.layout);
            let svg = render_svg(&layout, &config.theme, &config.render);
            write_png(&svg, &output, &config)?;
        }
        OutputFormat::Json => {
            let layout = compute_layout(Some(&tree), &config.layout);
            write_layout_dump(args.output.as_deref(), &layout, Some(&tree))?;
        }
        OutputFormat::Outline => {
            write_text(&render_outline_markdown(&tree), args.output.as_deref())?;
        }
        OutputFormat::Markdown => {
            write_text(&render_study_guide(&tree), args.output.as_deref())?;
        }
    }
    Ok(())
}

/// Command-line flags win over the config file.
fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(v) = args.orientation {
        config.layout.orientation = v;
    }
    if let Some(v) = args.size {
        config.layout.size_class = v;
    }
    if let Some(v) = args.edge_style {
        config.layout.edge_style = v;
    }
    if let Some(v) = args.root_policy {
        config.reconstruct.root_policy = v;
    }
    if let Some(v) = args.width {
        config.render.width = v;
    }
    if let Some(v) = args.height {
        config.render.height = v;
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn write_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)?,
        None => print!("{text}"),
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = Args::try_parse_from([
            "pmap",
            "-i",
            "response.json",
            "-e",
            "outline",
            "--orientation",
            "left-right",
            "--size",
            "large",
            "--edgeStyle",
            "curved",
            "--rootPolicy",
            "adopt-single",
            "-w",
            "640",
        ])
        .unwrap();
        assert_eq!(args.output_format, OutputFormat::Outline);

        let mut config = Config::default();
        apply_overrides(&mut config, &args);
        assert_eq!(config.layout.orientation, Orientation::LeftRight);
        assert_eq!(config.layout.size_class, NodeSizeClass::Large);
        assert_eq!(config.layout.edge_style, EdgeStyleTag::Curved);
        assert_eq!(config.reconstruct.root_policy, RootPolicy::AdoptSingle);
        assert_eq!(config.render.width, 640.0);
        assert_eq!(config.render.height, 800.0);
    }

    #[test]
    fn absent_flags_keep_config() {
        let args = Args::try_parse_from(["pmap"]).unwrap();
        assert_eq!(args.output_format, OutputFormat::Svg);
        let mut config = Config::default();
        config.layout.sibling_spacing = 4.0;
        apply_overrides(&mut config, &args);
        assert_eq!(config.layout.orientation, Orientation::TopDown);
        assert_eq!(config.layout.sibling_spacing, 4.0);
    }

    #[test]
    fn png_needs_output_path() {
        assert!(ensure_output(&None, "png").is_err());
        let path = PathBuf::from("map.png");
        assert_eq!(ensure_output(&Some(path.clone()), "png").unwrap(), path);
    }
}
