//! taxicab: render a random Manhattan-distance Voronoi diagram.
//!
//! Places random sources on a square grid, assigns every cell to its
//! nearest source under L1 distance, and writes a two-panel PNG captioned
//! "Source points" and "Voronoi regions".
//!
//! # Usage
//!
//! ```text
//! taxicab [OPTIONS] [USE_KD]
//! ```
//!
//! `USE_KD` selects the strategy: absent, `true` or `t` (any case) use the
//! spatial index; any other value uses brute force.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use taxicab_render::{PngOptions, SvgOptions};
use taxicab_voronoi::diagnostics::Clock;
use taxicab_voronoi::{AssignerKind, VoronoiConfig};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Render a random Manhattan-distance Voronoi diagram.
///
/// Per-cell progress is logged at TRACE level: pass `-v` or set
/// `RUST_LOG=trace` to see it.
#[derive(Parser)]
#[command(name = "taxicab", version)]
struct Cli {
    /// Strategy selector: absent, "true" or "t" uses the spatial index,
    /// anything else uses brute force.
    use_kd: Option<String>,

    /// Grid side length in cells.
    #[arg(long, default_value_t = VoronoiConfig::DEFAULT_SIZE)]
    size: u32,

    /// Number of random source points.
    #[arg(long, default_value_t = VoronoiConfig::DEFAULT_NUM_POINTS)]
    points: u32,

    /// Seed for reproducible source placement.
    #[arg(long)]
    seed: Option<u64>,

    /// PNG output path.
    #[arg(short, long, default_value = "voronoi.png")]
    output: PathBuf,

    /// Also write a captioned SVG to this path.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Pixels per grid cell in the captioned PNG.
    #[arg(long, default_value_t = PngOptions::DEFAULT_SCALE)]
    scale: u32,

    /// Full run config as a JSON string.
    ///
    /// When provided, the strategy argument and --size / --points are
    /// ignored. The JSON must be a valid `VoronoiConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,

    /// Print the run diagnostics report to stdout.
    #[arg(long)]
    report: bool,

    /// Print run diagnostics as JSON to stdout instead of a
    /// human-readable report.
    #[arg(long)]
    json: bool,

    /// Log per-cell progress.
    #[arg(short, long)]
    verbose: bool,
}

/// Map the positional strategy argument onto a strategy.
///
/// Absent selects the spatial index. Present, only `"true"` / `"t"`
/// (case-insensitive) keep the spatial index; every other value selects
/// brute force.
fn strategy_from_arg(arg: Option<&str>) -> AssignerKind {
    arg.map_or(AssignerKind::Indexed, |value| {
        let value = value.to_lowercase();
        AssignerKind::from_use_kd(value == "true" || value == "t")
    })
}

/// Build a [`VoronoiConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual parameters are ignored.
fn config_from_cli(cli: &Cli) -> Result<VoronoiConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(VoronoiConfig {
        size: cli.size,
        num_points: cli.points,
        strategy: strategy_from_arg(cli.use_kd.as_deref()),
    })
}

/// PNG layout for a run: captioned panels at the requested scale.
fn png_options(cli: &Cli) -> PngOptions {
    PngOptions {
        scale: cli.scale,
        ..PngOptions::default()
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    eprintln!("Using {}", config.strategy);

    let mut rng = cli
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    let (result, diagnostics) =
        match taxicab_voronoi::random_voronoi_with_diagnostics(&config, &mut rng, &StdClock) {
            Ok(output) => output,
            Err(e) => {
                eprintln!("Voronoi error: {e}");
                return ExitCode::FAILURE;
            }
        };

    if cli.json {
        match serde_json::to_string_pretty(&diagnostics) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing diagnostics: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else if cli.report {
        println!("{}", diagnostics.report());
    }

    let options = png_options(&cli);
    let png = match taxicab_render::to_png(&result.markers, &result.assignment, &options) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Render error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = std::fs::write(&cli.output, &png) {
        eprintln!("Error writing PNG to {}: {e}", cli.output.display());
        return ExitCode::FAILURE;
    }
    eprintln!(
        "PNG written to {} ({} bytes)",
        cli.output.display(),
        png.len(),
    );

    if let Some(ref svg_path) = cli.svg {
        let svg_options = SvgOptions {
            title: Some(format!(
                "{0}x{0} grid, {1} sources, {2}",
                config.size, config.num_points, config.strategy,
            )),
            ..SvgOptions::default()
        };
        let svg = match taxicab_render::to_svg(&result.markers, &result.assignment, &svg_options)
        {
            Ok(svg) => svg,
            Err(e) => {
                eprintln!("Render error: {e}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = std::fs::write(svg_path, &svg) {
            eprintln!("Error writing SVG to {}: {e}", svg_path.display());
            return ExitCode::FAILURE;
        }
        eprintln!("SVG written to {} ({} bytes)", svg_path.display(), svg.len());
    }

    ExitCode::SUCCESS
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn absent_argument_uses_index() {
        assert_eq!(strategy_from_arg(None), AssignerKind::Indexed);
    }

    #[test]
    fn truthy_arguments_use_index() {
        for arg in ["true", "TRUE", "True", "t", "T"] {
            assert_eq!(strategy_from_arg(Some(arg)), AssignerKind::Indexed, "{arg}");
        }
    }

    #[test]
    fn other_arguments_use_brute_force() {
        for arg in ["false", "f", "no", "0", "", "yes", "truthy"] {
            assert_eq!(
                strategy_from_arg(Some(arg)),
                AssignerKind::BruteForce,
                "{arg}"
            );
        }
    }

    #[test]
    fn cli_defaults_match_config_defaults() {
        let cli = Cli::parse_from(["taxicab"]);
        let config = config_from_cli(&cli).unwrap_or_default();
        assert_eq!(config, VoronoiConfig::default());
    }

    #[test]
    fn positional_false_selects_brute_force() {
        let cli = Cli::parse_from(["taxicab", "false", "--size", "12", "--points", "3"]);
        let config = config_from_cli(&cli).unwrap_or_default();
        assert_eq!(config, VoronoiConfig::new(12, 3, false));
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = Cli::parse_from([
            "taxicab",
            "false",
            "--config-json",
            r#"{"size": 9, "num_points": 2, "strategy": "Indexed"}"#,
        ]);
        let config = config_from_cli(&cli).unwrap_or_default();
        assert_eq!(config, VoronoiConfig::new(9, 2, true));
    }

    #[test]
    fn default_run_captions_both_panels() {
        let cli = Cli::parse_from(["taxicab", "--size", "90", "--seed", "5"]);
        let config = config_from_cli(&cli).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let result = taxicab_voronoi::random_voronoi(&config, &mut rng).unwrap();

        let options = png_options(&cli);
        assert!(options.caption_band() > 0);
        let image =
            taxicab_render::render_image(&result.markers, &result.assignment, &options).unwrap();

        let panel_px = config.size * options.scale;
        let band = options.gutter..options.gutter + options.caption_band();
        let ink_between = |from: u32, to: u32| {
            (from..to)
                .flat_map(|x| band.clone().map(move |y| (x, y)))
                .filter(|&(x, y)| image.get_pixel(x, y).0 == options.text_color)
                .count()
        };
        let left = ink_between(options.gutter, options.gutter + panel_px);
        let right = ink_between(2 * options.gutter + panel_px, 2 * (options.gutter + panel_px));
        assert!(left > 0, "no caption over the source panel");
        assert!(right > 0, "no caption over the region panel");
    }

    #[test]
    fn json_help_describes_replacement_of_report() {
        use clap::CommandFactory as _;

        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("as JSON to stdout instead of a human-readable report"));
        assert!(!help.contains("implies"));
    }

    #[test]
    fn invalid_config_json_is_reported() {
        let cli = Cli::parse_from(["taxicab", "--config-json", "{"]);
        assert!(config_from_cli(&cli).is_err());
    }
}
