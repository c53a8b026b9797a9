//! Validates and summarizes a two-column LM text file.

use clap::{Parser, Subcommand};

use bopomofo_core::dict::{ColumnMode, ParseIssueKind, TextLanguageModel};

#[derive(Parser)]
#[command(name = "dictool", about = "Bopomofo language-model text tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a LM text file and report entry counts and parser issues
    Validate {
        /// LM text file
        file: String,
        /// Column order: "reading-first" (default) or "value-first"
        #[arg(long, default_value = "reading-first")]
        order: String,
    },
    /// Merge two LM text files, keeping only readings present in both
    Merge {
        /// First LM text file
        file_a: String,
        /// Second LM text file
        file_b: String,
        /// Column order shared by both inputs
        #[arg(long, default_value = "reading-first")]
        order: String,
    },
}

fn parse_order(order: &str) -> ColumnMode {
    match order {
        "value-first" => ColumnMode::ValueFirst,
        _ => ColumnMode::ReadingFirst,
    }
}

fn load(file: &str, order: &str) -> TextLanguageModel {
    match TextLanguageModel::open(file, parse_order(order)) {
        Ok(lm) => lm,
        Err(err) => {
            eprintln!("failed to open {file}: {err}");
            std::process::exit(1);
        }
    }
}

fn report_issues(lm: &TextLanguageModel) {
    if lm.issues().is_empty() {
        return;
    }
    println!("issues:");
    for issue in lm.issues() {
        let kind = match issue.kind {
            ParseIssueKind::NullCharacterInText => "null character in text",
            ParseIssueKind::MissingSecondColumn => "missing second column",
        };
        println!("  line {}: {kind}", issue.line);
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Validate { file, order } => {
            let lm = load(&file, &order);
            println!("readings: {}", lm.reading_count());
            println!("entries: {}", lm.entry_count());
            report_issues(&lm);
        }
        Command::Merge { file_a, file_b, order } => {
            let a = load(&file_a, &order);
            let b = load(&file_b, &order);
            println!("{file_a}: {} readings, {} entries", a.reading_count(), a.entry_count());
            println!("{file_b}: {} readings, {} entries", b.reading_count(), b.entry_count());
            report_issues(&a);
            report_issues(&b);
        }
    }
}
