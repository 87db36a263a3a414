use anyhow::{Context, Result};
use rolldraw_core::{
    Clock, CopyError, DrawError, DrawPorts, DrawSession, Locale, ManualClock, Notice, RngState,
    SystemClock,
};
use rolldraw_data::{
    default_assets_dir, find_preset, load_draw_config, load_presets, read_roster, RosterPreset,
};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq)]
struct CliOptions {
    cui: bool,
    help: bool,
    instant: bool,
    dedupe: bool,
    rounds: u32,
    count: Option<f64>,
    seed: Option<u64>,
    assets: Option<PathBuf>,
    roster_file: Option<PathBuf>,
    preset: Option<String>,
    locale: Locale,
}

fn parse_cli_options(args: &[String]) -> Result<CliOptions> {
    let mut cui = false;
    let mut help = false;
    let mut instant = false;
    let mut dedupe = true;
    let mut rounds = 1u32;
    let mut count = None;
    let mut seed = None;
    let mut assets = None;
    let mut roster_file = None;
    let mut preset = None;
    let mut locale_arg: Option<String> = std::env::var("ROLLDRAW_LANG").ok();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--cui" => cui = true,
            "--help" | "-h" => help = true,
            "--instant" => instant = true,
            "--no-dedupe" => dedupe = false,
            "--lang" | "-l" => {
                if let Some(value) = args.get(idx + 1) {
                    locale_arg = Some(value.clone());
                    idx += 1;
                }
            }
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--rounds" => {
                if let Some(value) = args.get(idx + 1) {
                    rounds = value
                        .parse::<u32>()
                        .with_context(|| format!("invalid --rounds {value}"))?;
                    idx += 1;
                }
            }
            "--count" | "-n" => {
                if let Some(value) = args.get(idx + 1) {
                    count = Some(
                        value
                            .parse::<f64>()
                            .with_context(|| format!("invalid --count {value}"))?,
                    );
                    idx += 1;
                }
            }
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    assets = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--file" | "-f" => {
                if let Some(value) = args.get(idx + 1) {
                    roster_file = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--preset" => {
                if let Some(value) = args.get(idx + 1) {
                    preset = Some(value.clone());
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    Ok(CliOptions {
        cui,
        help,
        instant,
        dedupe,
        rounds,
        count,
        seed,
        assets,
        roster_file,
        preset,
        locale: Locale::from_opt(locale_arg.as_deref()),
    })
}

/// Prints spin frames in place on stdout and notices on stderr.
struct TerminalPorts {
    locale: Locale,
    show_frames: bool,
    frame_width: usize,
}

impl TerminalPorts {
    fn new(locale: Locale, show_frames: bool) -> Self {
        Self {
            locale,
            show_frames,
            frame_width: 0,
        }
    }

    fn clear_frame(&mut self) {
        if self.frame_width > 0 {
            print!("\r{}\r", " ".repeat(self.frame_width));
            let _ = io::stdout().flush();
            self.frame_width = 0;
        }
    }
}

impl DrawPorts for TerminalPorts {
    fn notify(&mut self, notice: &Notice) {
        let tag = if notice.is_error() { "!" } else { "*" };
        eprintln!(
            "{tag} {}: {}",
            notice.title(self.locale),
            notice.description(self.locale)
        );
    }

    fn copy_text(&mut self, _text: &str) -> Result<(), CopyError> {
        Err(CopyError::Unavailable(
            "the command line front-end prints results instead".to_string(),
        ))
    }

    fn render_spin_frame(&mut self, name: Option<&str>) {
        if !self.show_frames {
            return;
        }
        let Some(name) = name else {
            self.clear_frame();
            return;
        };
        let line = format!("  >> {name}");
        let width = line.chars().count();
        let pad = self.frame_width.saturating_sub(width);
        print!("\r{line}{}", " ".repeat(pad));
        let _ = io::stdout().flush();
        self.frame_width = width;
    }

    fn render_result(&mut self, result: &[String]) {
        if !result.is_empty() {
            self.clear_frame();
        }
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("ROLLDRAW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_cli_options(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(2);
        }
    };
    if options.help {
        print_help(options.locale);
        return;
    }
    if options.cui {
        let launch = rolldraw_cui::LaunchOptions {
            locale: Some(options.locale.code().to_string()),
            seed: options.seed,
            assets: options.assets.clone(),
            roster_file: options.roster_file.clone(),
            preset: options.preset.clone(),
            count: options.count,
            dedupe: Some(options.dedupe),
        };
        if let Err(err) = rolldraw_cui::run(launch) {
            eprintln!("cui launch error: {err:#}");
            std::process::exit(1);
        }
        return;
    }
    init_logging();
    if let Err(err) = run_headless(&options) {
        eprintln!("{}: {err:#}", options.locale.text("error", "错误"));
        std::process::exit(1);
    }
}

fn run_headless(options: &CliOptions) -> Result<()> {
    let locale = options.locale;
    let assets = options.assets.clone().unwrap_or_else(default_assets_dir);
    let config = load_draw_config(&assets)?;
    let rng = match options.seed {
        Some(seed) => RngState::from_seed(seed),
        None => RngState::from_entropy(),
    };
    let show_frames = !options.instant && io::stdout().is_terminal();
    let mut session = DrawSession::with_rng(config, rng, TerminalPorts::new(locale, show_frames));
    session.set_dedupe(options.dedupe);
    if let Some(count) = options.count {
        session.set_requested(count);
    }

    if let Some(path) = options.roster_file.as_ref() {
        session.set_raw_text(read_roster(path)?);
    } else {
        let presets = load_presets(&assets)?;
        let preset = pick_preset(&presets, options.preset.as_deref())?;
        session.load_roster(&preset.name, preset.as_text());
    }
    info!(
        seed = session.seed(),
        candidates = session.candidates().len(),
        rounds = options.rounds,
        "headless draw"
    );

    println!(
        "{} {} | {} {}",
        locale.text("candidates", "候选人数"),
        session.candidates().len(),
        locale.text("seed", "种子"),
        session.seed()
    );
    if options.instant {
        run_rounds(&mut session, &mut ManualClock::new(), options.rounds)?;
    } else {
        run_rounds(&mut session, &mut SystemClock, options.rounds)?;
    }

    if session.history().len() > 1 {
        println!();
        println!("{}", locale.text("History:", "历史记录："));
        for (idx, names) in session.history().iter().enumerate() {
            println!(
                "  {} {}: {}",
                locale.text("Round", "第"),
                round_label(locale, idx),
                names.join(", ")
            );
        }
    }
    Ok(())
}

fn pick_preset<'a>(presets: &'a [RosterPreset], key: Option<&str>) -> Result<&'a RosterPreset> {
    match key {
        Some(key) => find_preset(presets, key).with_context(|| format!("unknown preset {key}")),
        None => presets.first().context("no roster given and no presets available"),
    }
}

fn run_rounds<C: Clock>(
    session: &mut DrawSession<TerminalPorts>,
    clock: &mut C,
    rounds: u32,
) -> Result<(), DrawError> {
    let locale = session.ports().locale;
    for round in 1..=rounds.max(1) {
        let outcome = session.drive(clock);
        for event in session.drain_events() {
            debug!(round, ?event, "draw event");
        }
        let Some(winners) = outcome? else {
            continue;
        };
        if rounds > 1 {
            println!("[{} {round}]", locale.text("round", "轮次"));
        }
        for (idx, name) in winners.iter().enumerate() {
            println!("NO.{} {name}", idx + 1);
        }
    }
    Ok(())
}

fn round_label(locale: Locale, idx: usize) -> String {
    match locale {
        Locale::EnUs => format!("{}", idx + 1),
        Locale::ZhCn => format!("{} 轮", idx + 1),
    }
}

fn print_help(locale: Locale) {
    println!(
        "{}",
        locale.text("Usage: rolldraw [options]", "用法：rolldraw [选项]")
    );
    println!();
    println!(
        "  -f, --file <path>        {}",
        locale.text(
            "read names from a file, one per line (- for stdin)",
            "从文件读取名单，每行一个（- 表示标准输入）"
        )
    );
    println!(
        "  --preset <id|name>       {}",
        locale.text(
            "use a roster preset from presets.json",
            "使用 presets.json 中的预设名单"
        )
    );
    println!(
        "  -n, --count <n>          {}",
        locale.text("how many names to draw (default 1)", "抽取人数（默认 1）")
    );
    println!(
        "  --no-dedupe              {}",
        locale.text("keep repeated names", "保留重复名字")
    );
    println!(
        "  --rounds <n>             {}",
        locale.text("number of draws to run", "连续抽取的轮数")
    );
    println!(
        "  --instant                {}",
        locale.text("skip the spin animation", "跳过滚动动画")
    );
    println!(
        "  --seed <u64>             {}",
        locale.text("fixed random seed", "固定随机种子")
    );
    println!(
        "  --assets <dir>           {}",
        locale.text(
            "assets directory (draw.json, presets.json)",
            "资源目录（draw.json、presets.json）"
        )
    );
    println!(
        "  -l, --lang <locale>      {}",
        locale.text("en_US or zh_CN", "en_US 或 zh_CN")
    );
    println!(
        "  --cui                    {}",
        locale.text("open the terminal UI", "打开终端界面")
    );
    println!(
        "  -h, --help               {}",
        locale.text("show this help", "显示帮助")
    );
    println!();
    println!(
        "{}",
        locale.text(
            "Environment: ROLLDRAW_LANG, ROLLDRAW_ASSETS, ROLLDRAW_LOG, ROLLDRAW_LOG_FILE",
            "环境变量：ROLLDRAW_LANG、ROLLDRAW_ASSETS、ROLLDRAW_LOG、ROLLDRAW_LOG_FILE"
        )
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn defaults_without_flags() {
        let options = parse_cli_options(&args(&["--lang", "en"])).expect("parse");
        assert!(!options.cui);
        assert!(options.dedupe);
        assert_eq!(options.rounds, 1);
        assert_eq!(options.count, None);
        assert_eq!(options.locale, Locale::EnUs);
    }

    #[test]
    fn parses_draw_flags() {
        let options = parse_cli_options(&args(&[
            "-f", "names.txt", "-n", "2.5", "--rounds", "3", "--instant", "--no-dedupe",
            "--seed", "9", "-l", "zh-CN",
        ]))
        .expect("parse");
        assert_eq!(options.roster_file, Some(PathBuf::from("names.txt")));
        assert_eq!(options.count, Some(2.5));
        assert_eq!(options.rounds, 3);
        assert!(options.instant);
        assert!(!options.dedupe);
        assert_eq!(options.seed, Some(9));
        assert_eq!(options.locale, Locale::ZhCn);
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(parse_cli_options(&args(&["--rounds", "-1"])).is_err());
        assert!(parse_cli_options(&args(&["--count", "lots"])).is_err());
    }

    #[test]
    fn preset_lookup() {
        let presets = rolldraw_data::builtin_presets();
        assert_eq!(pick_preset(&presets, None).expect("first").id, "demo");
        assert!(pick_preset(&presets, Some("Demo")).is_ok());
        assert!(pick_preset(&presets, Some("nope")).is_err());
        assert!(pick_preset(&[], None).is_err());
    }

    #[test]
    fn instant_rounds_fill_history() {
        let config = rolldraw_core::DrawConfig::default();
        let mut session = DrawSession::new(config, 5, TerminalPorts::new(Locale::EnUs, false));
        session.set_raw_text("a\nb\nc\nd");
        session.set_requested(2.0);
        run_rounds(&mut session, &mut ManualClock::new(), 3).expect("rounds");
        assert_eq!(session.history().len(), 3);
        assert!(session.history().iter().all(|names| names.len() == 2));
        assert_eq!(session.drain_events().count(), 0);
    }

    #[test]
    fn rejected_round_still_drains_events() {
        let config = rolldraw_core::DrawConfig::default();
        let mut session = DrawSession::new(config, 5, TerminalPorts::new(Locale::EnUs, false));
        assert_eq!(
            run_rounds(&mut session, &mut ManualClock::new(), 2),
            Err(DrawError::EmptyRoster)
        );
        assert_eq!(session.drain_events().count(), 0);
    }
}
