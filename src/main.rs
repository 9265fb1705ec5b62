//! soundshift - 음운 변화 규칙 적용 CLI
//!
//! 사용법: soundshift [--config <path>] [--trace] [--json] [word ...]
//! 단어가 없으면 표준 입력에서 한 줄에 한 단어씩 읽습니다.

use clap::Parser;
use soundshift::config::{config_path, load_config};
use soundshift::{SoundChangeEngine, WordResult};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "soundshift")]
#[command(about = "Apply sound-change rules to words", long_about = None)]
struct Cli {
    /// Config file path (default: $XDG_CONFIG_HOME/soundshift/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the rule lines that changed each word
    #[arg(short, long)]
    trace: bool,

    /// Print one JSON object per word
    #[arg(long)]
    json: bool,

    /// Words to transform (read from stdin when empty)
    words: Vec<String>,
}

fn print_result(out: &mut impl Write, result: &WordResult, json: bool) -> io::Result<()> {
    if json {
        let line = serde_json::to_string(result).map_err(io::Error::other)?;
        return writeln!(out, "{}", line);
    }

    match (&result.output, &result.error) {
        (Some(output), _) => writeln!(out, "{} -> {}", result.input, output)?,
        (None, Some(error)) => writeln!(out, "{} -> ERROR: {}", result.input, error)?,
        (None, None) => {}
    }
    for step in &result.trace {
        writeln!(out, "    line {}: {} -> {}", step.line, step.before, step.after)?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), String> {
    let config_file = cli.config.unwrap_or_else(config_path);

    // 설정 로드
    let config = load_config(&config_file)?;
    let base_dir = config_file.parent();
    let rules = config.rules_text(base_dir)?;
    let categories = config.category_table(base_dir)?;
    let trace = cli.trace || config.trace;

    let mut engine = SoundChangeEngine::new(categories);
    engine.set_rules(&rules).map_err(|e| format!("invalid rule: {}", e))?;
    log::info!("규칙 {}개 로드: {}", engine.rule_count(), config_file.display());

    let words = if cli.words.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("failed to read stdin: {}", e))?
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    } else {
        cli.words
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for result in engine.apply_all(words.iter().map(String::as_str), trace) {
        print_result(&mut out, &result, cli.json).map_err(|e| format!("write failed: {}", e))?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // 로깅 초기화 (error/warn만 출력)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
