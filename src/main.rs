//! Command line front end for the lane detection dashboard.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use lanescope::app_dirs;
use lanescope::backend::{Backend, HttpBackend, ImageKind};
use lanescope::catalog::{Catalogs, MetricKind, Scenario};
use lanescope::config::{self, AppConfig};
use lanescope::dashboard::{Dashboard, DashboardSnapshot};
use lanescope::logging::{self, ConsoleVerbosity};
use lanescope::scoring::{self, MetricRow};
use lanescope::session::{SelectedFile, UploadStatus};
use lanescope::view::SliceSource;

const DEFAULT_WAIT: Duration = Duration::from_secs(120);

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    let verbosity = if options.json {
        ConsoleVerbosity::Quiet
    } else {
        ConsoleVerbosity::Normal
    };
    if let Err(err) = logging::init(verbosity) {
        eprintln!("Logging disabled: {err}");
    }
    let mut config = config::load_or_default().map_err(|err| err.to_string())?;
    let catalogs = Arc::new(Catalogs::builtin().map_err(|err| err.to_string())?);
    if let Some(base_url) = &options.backend {
        config.backend.base_url = base_url.clone();
    }
    match &options.command {
        Command::Scenarios => {
            print_scenarios(&catalogs);
            Ok(())
        }
        Command::Report => {
            let mut dashboard = open_dashboard(catalogs, &config)?;
            apply_selectors(&mut dashboard, &options);
            if let Some(input) = &options.input {
                dashboard.select_input(input.clone());
                settle(&mut dashboard, options.wait)?;
            }
            emit(&dashboard.snapshot(), &options)
        }
        Command::Meta { input } => {
            let mut dashboard = open_dashboard(catalogs, &config)?;
            apply_selectors(&mut dashboard, &options);
            dashboard.select_input(input.clone());
            settle(&mut dashboard, options.wait)?;
            emit(&dashboard.snapshot(), &options)?;
            save_images_if_requested(&dashboard, &options)
        }
        Command::Upload { path } => {
            let mut dashboard = open_dashboard(catalogs, &config)?;
            apply_selectors(&mut dashboard, &options);
            let file = SelectedFile::from_path(path)
                .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;
            dashboard.select_file(file);
            dashboard.upload().map_err(|err| err.to_string())?;
            settle(&mut dashboard, options.wait)?;
            let snapshot = dashboard.snapshot();
            emit(&snapshot, &options)?;
            save_images_if_requested(&dashboard, &options)?;
            if snapshot.status == UploadStatus::Failed {
                return Err(snapshot.message);
            }
            Ok(())
        }
        Command::Tusimple => {
            let scenario = options.scenario.unwrap_or_default();
            let record = lanescope::tusimple::preview_for(scenario, options.input.as_deref());
            let json = record.to_json_pretty().map_err(|err| err.to_string())?;
            println!("{json}");
            Ok(())
        }
    }
}

fn open_dashboard(catalogs: Arc<Catalogs>, config: &AppConfig) -> Result<Dashboard, String> {
    let backend = HttpBackend::new(&config.backend).map_err(|err| err.to_string())?;
    Dashboard::new(catalogs, config, Arc::new(backend)).map_err(|err| err.to_string())
}

fn apply_selectors(dashboard: &mut Dashboard, options: &CliOptions) {
    if let Some(scenario) = options.scenario {
        dashboard.select_scenario(scenario);
    }
    if options.raw == dashboard.view().normalize {
        dashboard.toggle_normalize();
    }
}

fn settle(dashboard: &mut Dashboard, wait: Duration) -> Result<(), String> {
    if !dashboard.wait_idle(wait) {
        return Err(format!(
            "Backend did not answer within {}s",
            wait.as_secs()
        ));
    }
    dashboard.tick(Instant::now());
    Ok(())
}

fn emit(snapshot: &DashboardSnapshot, options: &CliOptions) -> Result<(), String> {
    if options.json {
        let json = serde_json::to_string_pretty(snapshot).map_err(|err| err.to_string())?;
        println!("{json}");
    } else {
        print_snapshot(snapshot);
    }
    Ok(())
}

fn print_snapshot(snapshot: &DashboardSnapshot) {
    println!("场景: {}", snapshot.view.scenario);
    match &snapshot.slice {
        SliceSource::Sample(input) => println!("数据: 样本 {input}"),
        SliceSource::Aggregate => println!("数据: 场景汇总"),
    }
    if let Some(input) = &snapshot.view.current_input {
        println!("输入: {input} (识别场景: {})", snapshot.scene_label);
    }
    match (snapshot.best, &snapshot.best_metrics) {
        (Some(best), Some(metrics)) => {
            let score = metrics
                .score
                .map(|s| scoring::format_metric(MetricKind::Score, s))
                .unwrap_or_else(|| "-".to_string());
            println!("最佳算法: {best} (S = {score})");
        }
        _ => println!("最佳算法: -"),
    }
    if let Some(decision) = &snapshot.decision {
        println!(
            "推荐: {} / 备选: {} (权重 {:.2}) {}",
            decision.best, decision.backup, decision.weight, decision.rationale
        );
    }
    println!();
    let title = if snapshot.view.normalize {
        "指标 (归一化)"
    } else {
        "指标"
    };
    print_rows(title, &snapshot.line_rows, snapshot.view.normalize);
    if let Some(radar) = &snapshot.radar {
        println!();
        println!("{} vs {}", radar.first, radar.second);
        for row in &radar.rows {
            println!(
                "  {:<8} {:>6.3} {:>6.3}",
                row.metric.label(),
                row.first,
                row.second
            );
        }
    }
    if let Some(url) = &snapshot.input_image_url {
        println!();
        println!("输入图像: {url}");
    }
    if let Some(url) = &snapshot.output_image_url {
        println!("输出图像: {url}");
    }
    if let Some(preview) = &snapshot.preview {
        println!(
            "本地预览: {} ({}x{})",
            preview.file_name, preview.width, preview.height
        );
    }
    if !snapshot.message.is_empty() {
        println!();
        println!("{}", snapshot.message);
    }
}

fn print_rows(title: &str, rows: &[MetricRow], normalized: bool) {
    println!("{title}");
    for row in rows {
        let cells = row
            .values
            .iter()
            .map(|(algorithm, value)| {
                let text = if normalized {
                    format!("{value:.3}")
                } else {
                    scoring::format_metric(row.metric, *value)
                };
                format!("{algorithm}={text}")
            })
            .collect::<Vec<_>>()
            .join("  ");
        println!("  {:<8} {cells}", row.metric.label());
    }
}

fn print_scenarios(catalogs: &Catalogs) {
    for scenario in Scenario::ALL {
        let decision = catalogs.decisions.resolve_best(scenario);
        match decision.entry() {
            Some(entry) => println!(
                "{} ({}): 权重 {:.2}, 推荐 {}, 备选 {}",
                scenario,
                scenario.slug(),
                entry.weight,
                entry.best,
                entry.backup
            ),
            None => println!("{} ({}): 无推荐", scenario, scenario.slug()),
        }
        let samples = catalogs.samples.samples(scenario).collect::<Vec<_>>();
        if !samples.is_empty() {
            println!("  样本: {}", samples.join(", "));
        }
    }
    println!("权重合计: {:.2}", catalogs.decisions.weight_total());
}

fn save_images_if_requested(dashboard: &Dashboard, options: &CliOptions) -> Result<(), String> {
    let Some(dir) = options.save_dir.as_ref() else {
        return Ok(());
    };
    let dir = match dir {
        Some(dir) => dir.clone(),
        None => app_dirs::downloads_dir().map_err(|err| err.to_string())?,
    };
    std::fs::create_dir_all(&dir)
        .map_err(|err| format!("Failed to create {}: {err}", dir.display()))?;
    let session = dashboard.session();
    let cache_bust = session.cache_bust();
    let backend = dashboard.backend();
    if let Some(input) = session.current_input() {
        save_image(backend.as_ref(), ImageKind::Input, input, cache_bust, &dir)?;
    }
    if let Some(output) = session.metadata().and_then(|meta| meta.output.as_deref()) {
        save_image(backend.as_ref(), ImageKind::Output, output, cache_bust, &dir)?;
    }
    Ok(())
}

fn save_image(
    backend: &dyn Backend,
    kind: ImageKind,
    name: &str,
    cache_bust: u64,
    dir: &Path,
) -> Result<(), String> {
    let bytes = backend
        .fetch_image(kind, name, cache_bust)
        .map_err(|err| format!("Failed to fetch {name}: {err}"))?;
    let path = dir.join(name);
    std::fs::write(&path, bytes).map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
    eprintln!("Saved {}", path.display());
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Report,
    Scenarios,
    Tusimple,
    Meta { input: String },
    Upload { path: PathBuf },
}

#[derive(Debug, Clone)]
struct CliOptions {
    command: Command,
    scenario: Option<Scenario>,
    input: Option<String>,
    backend: Option<String>,
    raw: bool,
    json: bool,
    /// `Some(None)` saves into the default downloads directory.
    save_dir: Option<Option<PathBuf>>,
    wait: Duration,
}

fn parse_args(args: Vec<String>) -> Result<Option<CliOptions>, String> {
    let Some(command_name) = args.first() else {
        println!("{}", help_text());
        return Ok(None);
    };
    let mut positional = Vec::new();
    let mut options = CliOptions {
        command: Command::Report,
        scenario: None,
        input: None,
        backend: None,
        raw: false,
        json: false,
        save_dir: None,
        wait: DEFAULT_WAIT,
    };
    let mut idx = 1usize;
    match command_name.as_str() {
        "-h" | "--help" | "help" => {
            println!("{}", help_text());
            return Ok(None);
        }
        "report" | "scenarios" | "tusimple" | "meta" | "upload" => {}
        unknown => return Err(format!("Unknown command: {unknown}\n\n{}", help_text())),
    }
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--scene" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--scene requires a value".to_string())?;
                options.scenario = Some(Scenario::parse(value).map_err(|err| err.to_string())?);
            }
            "--input" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--input requires a value".to_string())?;
                options.input = Some(value.clone());
            }
            "--backend" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--backend requires a value".to_string())?;
                options.backend = Some(value.clone());
            }
            "--wait" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--wait requires a value".to_string())?;
                let secs = value
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid --wait value: {value}"))?;
                options.wait = Duration::from_secs(secs.max(1));
            }
            "--save" => options.save_dir = Some(None),
            "--save-to" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--save-to requires a value".to_string())?;
                options.save_dir = Some(Some(PathBuf::from(value)));
            }
            "--raw" => options.raw = true,
            "--json" => options.json = true,
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
            }
            value => positional.push(value.to_string()),
        }
        idx += 1;
    }

    options.command = match command_name.as_str() {
        "scenarios" => Command::Scenarios,
        "tusimple" => Command::Tusimple,
        "meta" => {
            let input = single_positional(positional, "meta <input-name>")?;
            Command::Meta { input }
        }
        "upload" => {
            let path = single_positional(positional, "upload <image-path>")?;
            Command::Upload {
                path: PathBuf::from(path),
            }
        }
        _ => {
            if let Some(extra) = positional.first() {
                return Err(format!("Unexpected argument: {extra}"));
            }
            Command::Report
        }
    };
    Ok(Some(options))
}

fn single_positional(mut positional: Vec<String>, usage: &str) -> Result<String, String> {
    match positional.len() {
        1 => Ok(positional.remove(0)),
        0 => Err(format!("Usage: lanescope {usage}")),
        _ => Err(format!("Unexpected argument: {}", positional[1])),
    }
}

fn help_text() -> String {
    [
        "lanescope",
        "",
        "Usage:",
        "  lanescope report [--scene <scene>] [--input <name>] [--raw] [--json]",
        "  lanescope upload <image-path> [--scene <scene>] [--save | --save-to <dir>] [--json]",
        "  lanescope meta <input-name> [--save | --save-to <dir>] [--json]",
        "  lanescope scenarios",
        "  lanescope tusimple [--scene <scene>] [--input <name>]",
        "",
        "Options:",
        "  --scene <scene>    Scenario label or slug (standard, adverse-weather, lighting, occlusion, complex-road)",
        "  --input <name>     Uploaded input name, e.g. input3.jpg",
        "  --backend <url>    Override the backend base URL from config.toml",
        "  --raw              Show raw metric values instead of normalized ones",
        "  --json             Print the dashboard snapshot as JSON",
        "  --wait <secs>      How long to wait for backend replies (default 120)",
        "  --save             Save input/output images to the downloads directory",
        "  --save-to <dir>    Save input/output images to <dir>",
        "",
        "Console logging follows LANESCOPE_LOG (e.g. lanescope=debug); --json keeps it to errors.",
    ]
    .join("\n")
}
