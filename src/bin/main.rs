use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::style::Stylize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use unieraser_core::core::classifier::display_char;
use unieraser_core::persistence::{load_settings_file, save_settings_file};
use unieraser_core::{
    summarize, AnalysisInventory, ConversionResult, EmojiMode, Session, SettingsPatch, Strictness,
};

#[derive(Clone, Copy, ValueEnum)]
enum EmojiArg {
    Remove,
    Keep,
    Convert,
}

impl From<EmojiArg> for EmojiMode {
    fn from(arg: EmojiArg) -> Self {
        match arg {
            EmojiArg::Remove => EmojiMode::Remove,
            EmojiArg::Keep => EmojiMode::Keep,
            EmojiArg::Convert => EmojiMode::Convert,
        }
    }
}

/// Rewrite smart punctuation, invisible characters, emoji and other
/// non-ASCII text into plain ASCII.
#[derive(Parser)]
#[command(name = "unieraser", version)]
struct Cli {
    /// File to clean. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// What to do with emoji.
    #[arg(long, value_enum)]
    emoji: Option<EmojiArg>,

    /// ASCII-only output (also simplifies accents).
    #[arg(long)]
    strict: bool,

    /// Leave smart quotes, dashes and look-alike spaces alone.
    #[arg(long)]
    no_punctuation: bool,

    /// Keep zero-width and directional characters.
    #[arg(long)]
    keep_hidden: bool,

    /// Simplify accented letters.
    #[arg(long)]
    strip_accents: bool,

    /// Convert inside fenced code blocks too.
    #[arg(long)]
    no_preserve_code: bool,

    /// Convert inside links and URLs too.
    #[arg(long)]
    no_preserve_links: bool,

    /// Settings payload to import before converting.
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Characters to leave untouched.
    #[arg(long, value_name = "CHARS")]
    skip: Option<String>,

    /// Print an inventory of the input's non-ASCII characters to stderr.
    #[arg(long)]
    analyze: bool,

    /// Print the change log to stderr.
    #[arg(long)]
    changes: bool,

    /// Save the effective settings payload.
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Debug logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn patch(&self) -> SettingsPatch {
        SettingsPatch {
            emoji_mode: self.emoji.map(EmojiMode::from),
            fix_punctuation: self.no_punctuation.then_some(false),
            remove_hidden: self.keep_hidden.then_some(false),
            keep_accents: self.strip_accents.then_some(false),
            preserve_code: self.no_preserve_code.then_some(false),
            preserve_links: self.no_preserve_links.then_some(false),
            ..Default::default()
        }
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("could not read '{}'", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("could not read stdin")?;
            Ok(text)
        }
    }
}

fn print_changes(result: &ConversionResult) {
    let summary = summarize(&result.change_log);
    eprintln!(
        "{} {}",
        format!("{} changes", result.total_changes).bold().green(),
        summary.parts().join(", ").dim()
    );
    for entry in &result.change_log {
        let arrow = format!(
            "{} -> {:?}",
            display_char(&entry.original),
            entry.replacement
        );
        let line = format!("  {:>4}x  {:<24} {} ({})", entry.count, arrow, entry.label, entry.category);
        if entry.skipped {
            eprintln!("{} {}", line.dark_grey(), "[skipped]".yellow());
        } else {
            eprintln!("{line}");
        }
    }
}

fn print_analysis(inventory: &AnalysisInventory) {
    eprintln!(
        "{}",
        format!("{} non-ASCII characters", inventory.total_issues).bold().cyan()
    );
    let buckets = [
        ("hidden", &inventory.hidden),
        ("punctuation", &inventory.punctuation),
        ("emoji", &inventory.emoji),
        ("accent", &inventory.accent),
        ("other", &inventory.other),
    ];
    for (name, items) in buckets {
        if items.is_empty() {
            continue;
        }
        eprintln!("  {}", name.bold());
        for item in items.iter() {
            eprintln!(
                "    {:>4}x  {:<10} {}",
                item.count(),
                display_char(&item.ch.to_string()),
                item.label
            );
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let mut session = Session::new();

    if let Some(path) = &cli.settings {
        let imported = load_settings_file(path)
            .with_context(|| format!("could not import settings from '{}'", path.display()))?;
        session.apply_import(&imported);
    }
    if cli.strict {
        session.apply_strictness(Strictness::Strict);
    }
    session.update_settings(&cli.patch());
    if let Some(chars) = &cli.skip {
        for ch in chars.chars() {
            session.skip_char(&ch.to_string());
        }
    }

    session.set_input(read_input(cli.input.as_ref())?);

    let mut stdout = io::stdout().lock();
    stdout.write_all(session.output().text.as_bytes())?;
    stdout.flush()?;

    if cli.analyze {
        print_analysis(session.analysis());
    }
    if cli.changes {
        print_changes(session.output());
    }
    if let Some(path) = &cli.export {
        save_settings_file(path, session.settings(), session.rules())
            .with_context(|| format!("could not save settings to '{}'", path.display()))?;
        eprintln!("Settings saved to '{}'", path.display());
    }

    Ok(())
}
