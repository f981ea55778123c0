use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use log::info;

use rusty_chroma::colour::metrics::rgb_to_hex;
use rusty_chroma::{Pipeline, PipelineConfig};

struct CliArgs {
    config: PathBuf,
    group: Option<String>,
    illuminant: String,
    blackbody: Option<f64>,
}

const USAGE: &str =
    "usage: rusty-chroma <config.json> [--group NAME] [--illuminant NAME] [--blackbody KELVIN]";

fn parse_args() -> Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let mut config = None;
    let mut group = None;
    let mut illuminant = "D65".to_string();
    let mut blackbody = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--group" => group = Some(args.next().context("--group requires a value")?),
            "--illuminant" => {
                illuminant = args.next().context("--illuminant requires a value")?
            }
            "--blackbody" => {
                let kelvin = args.next().context("--blackbody requires a value")?;
                blackbody = Some(
                    kelvin
                        .parse::<f64>()
                        .with_context(|| format!("invalid temperature '{kelvin}'"))?,
                );
            }
            "--help" | "-h" => bail!("{USAGE}"),
            other if config.is_none() => config = Some(PathBuf::from(other)),
            other => bail!("unexpected argument '{other}'\n{USAGE}"),
        }
    }

    Ok(CliArgs {
        config: config.with_context(|| USAGE.to_string())?,
        group,
        illuminant,
        blackbody,
    })
}

fn run() -> Result<()> {
    let args = parse_args()?;
    let config = PipelineConfig::from_path(&args.config)?;

    let mut pipeline = Pipeline::new(config);
    pipeline.load_directories()?;
    pipeline.load_inline_samples();
    pipeline.build_groups();

    let group_names: Vec<String> = match &args.group {
        Some(name) => vec![name.clone()],
        None => pipeline
            .config()
            .groups
            .iter()
            .map(|g| g.name.clone())
            .collect(),
    };

    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record([
        "group",
        "sample",
        "label",
        "hex",
        "r",
        "g",
        "b",
        "L",
        "a",
        "b_star",
        "whiteness",
        "tint",
        "chroma",
        "delta_e",
        "delta_c",
        "decolouring_pct",
        "white_distance_pct",
    ])?;

    for group_name in &group_names {
        let results = match args.blackbody {
            Some(kelvin) => pipeline.analyse_blackbody(group_name, kelvin, true)?,
            None => pipeline.analyse_group(group_name, &args.illuminant, true)?,
        };
        info!("analysed group '{group_name}': {} samples", results.len());

        for (key, result) in &results {
            // An explicit null label in the config suppresses labelling.
            let label = match pipeline.config().labels.get(key) {
                Some(Some(label)) => label.clone(),
                Some(None) => String::new(),
                None => key.clone(),
            };
            let [r, g, b] = result.rgb_int();
            let metrics = &result.metrics;
            writer.write_record([
                group_name.clone(),
                key.clone(),
                label,
                rgb_to_hex(metrics.rgb),
                r.to_string(),
                g.to_string(),
                b.to_string(),
                format!("{:.4}", metrics.lab[0]),
                format!("{:.4}", metrics.lab[1]),
                format!("{:.4}", metrics.lab[2]),
                format!("{:.4}", metrics.whiteness),
                format!("{:.4}", metrics.tint),
                format!("{:.4}", metrics.chroma),
                format!("{:.4}", metrics.delta_e),
                format!("{:.4}", metrics.delta_c),
                format!("{:.2}", result.decolouring_percentage),
                format!("{:.2}", result.white_distance),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
