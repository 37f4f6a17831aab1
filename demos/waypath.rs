//! Terminal waypoint search demo.
//!
//! Run: cargo run --bin waypath -- --generate 40x20 --waypoints 3 --heuristic astar

use std::error::Error;
use std::time::Duration;

use waypath_core::Grid;
use waypath_demos::{DEFAULT_HEIGHT, DEFAULT_WIDTH, Driver, Speed, generate, render, summary};
use waypath_search::{HeuristicKind, PathFinder, SearchConfig, SearchStatus};

const FRAME_DELAY: Duration = Duration::from_millis(40);
const DEFAULT_WAYPOINTS: usize = 3;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--map <file> | --generate <W>x<H>] [--waypoints <n>] [--seed <n>]\n  \
         {program} ... [--heuristic <astar|dijkstra|crow|folly> | --all] [--speed <name>]\n  \
         {program} ... [--threshold <cost>] [--save <file>] [--animate]\n\n\
         Speeds: slow, fast, faster, fastest, ludicrous.\n\
         Without --map a {DEFAULT_WIDTH}x{DEFAULT_HEIGHT} map with {DEFAULT_WAYPOINTS} waypoints is generated;\n\
         --generate, --waypoints and --seed only apply to generated maps.\n\
         --save writes the map before searching. --animate redraws after every tick.\n\
         Set RUST_LOG=debug to trace the search."
    );
}

#[derive(Debug, Clone, PartialEq)]
struct CliOptions {
    map: Option<String>,
    size: Option<(i32, i32)>,
    waypoints: Option<usize>,
    seed: Option<u64>,
    heuristic: HeuristicKind,
    all: bool,
    speed: Speed,
    threshold: Option<f32>,
    save: Option<String>,
    animate: bool,
    help: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            map: None,
            size: None,
            waypoints: None,
            seed: None,
            heuristic: HeuristicKind::default(),
            all: false,
            speed: Speed::default(),
            threshold: None,
            save: None,
            animate: false,
            help: false,
        }
    }
}

fn parse_size(raw: &str) -> Option<(i32, i32)> {
    let (w, h) = raw.split_once(['x', 'X'])?;
    let (w, h) = (w.parse::<i32>().ok()?, h.parse::<i32>().ok()?);
    (w > 0 && h > 0).then_some((w, h))
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("{flag} needs a value"))
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--map" => options.map = Some(value(&mut args, "--map")?),
            "--generate" => {
                let raw = value(&mut args, "--generate")?;
                options.size = Some(parse_size(&raw).ok_or_else(|| format!("bad size `{raw}`"))?);
            }
            "--waypoints" => {
                let raw = value(&mut args, "--waypoints")?;
                let count = raw.parse::<usize>().map_err(|_| format!("bad count `{raw}`"))?;
                options.waypoints = Some(count);
            }
            "--seed" => {
                let raw = value(&mut args, "--seed")?;
                options.seed = Some(raw.parse::<u64>().map_err(|_| format!("bad seed `{raw}`"))?);
            }
            "--heuristic" => {
                let raw = value(&mut args, "--heuristic")?;
                options.heuristic = raw.parse::<HeuristicKind>().map_err(|e| format!("{e}"))?;
            }
            "--all" => options.all = true,
            "--speed" => options.speed = value(&mut args, "--speed")?.parse::<Speed>()?,
            "--threshold" => {
                let raw = value(&mut args, "--threshold")?;
                let threshold = raw.parse::<f32>();
                options.threshold = Some(threshold.map_err(|_| format!("bad threshold `{raw}`"))?);
            }
            "--save" => options.save = Some(value(&mut args, "--save")?),
            "--animate" => options.animate = true,
            "-h" | "--help" => options.help = true,
            _ => return Err(format!("unexpected argument `{arg}`")),
        }
    }

    if options.map.is_some() {
        let generation = [
            ("--generate", options.size.is_some()),
            ("--waypoints", options.waypoints.is_some()),
            ("--seed", options.seed.is_some()),
        ];
        if let Some((flag, _)) = generation.into_iter().find(|&(_, given)| given) {
            return Err(format!("--map and {flag} can not be combined"));
        }
    }
    Ok(options)
}

fn load_grid(options: &CliOptions) -> Result<Grid, Box<dyn Error>> {
    if let Some(path) = &options.map {
        log::info!("loading map from {path}");
        return Ok(Grid::load(path)?);
    }
    let (w, h) = options.size.unwrap_or((DEFAULT_WIDTH, DEFAULT_HEIGHT));
    let waypoints = options.waypoints.unwrap_or(DEFAULT_WAYPOINTS);
    Ok(generate(w, h, waypoints, options.seed.unwrap_or(0))?)
}

fn search(grid: &Grid, heuristic: HeuristicKind, options: &CliOptions) -> String {
    let mut config = SearchConfig::default();
    if let Some(threshold) = options.threshold {
        config = config.with_impassable_threshold(threshold);
    }
    let pf = PathFinder::with_config(grid, heuristic, config);
    let mut driver = Driver::new(pf, options.speed);
    let status = driver.finish(|pf| {
        if options.animate {
            // clear screen, cursor home
            println!("\x1b[2J\x1b[H{}{}", render(pf), summary(pf));
            std::thread::sleep(FRAME_DELAY);
        }
    });
    if status == SearchStatus::Failed {
        log::warn!("{heuristic} found no route through every waypoint");
    }
    let pf = driver.pathfinder();
    if !options.animate {
        print!("{}", render(pf));
    }
    summary(pf)
}

fn main() {
    env_logger::init();

    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "waypath".to_owned());

        let options = match parse_options(args) {
            Ok(options) if options.help => {
                print_usage(&program);
                return Ok(());
            }
            Ok(options) => options,
            Err(err) => {
                eprintln!("{program}: {err}");
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let grid = load_grid(&options)?;
        if let Some(path) = &options.save {
            grid.save(path)?;
            log::info!("saved map to {path}");
        }

        let heuristics: Vec<HeuristicKind> = if options.all {
            HeuristicKind::ALL.to_vec()
        } else {
            vec![options.heuristic]
        };
        let mut summaries = Vec::with_capacity(heuristics.len());
        for heuristic in heuristics {
            summaries.push(search(&grid, heuristic, &options));
            println!();
        }
        for line in summaries {
            println!("{line}");
        }
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("waypath: {err}");
        std::process::exit(1);
    }
}
