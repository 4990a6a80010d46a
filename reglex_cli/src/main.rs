//! # reglex CLI
//!
//! Compiles a grammar file and prints the tokens of an input file (or stdin),
//! one per line.

use clap::Parser;
use reglex::config::LexerPreferences;
use reglex::grammar::GrammarModel;
use reglex::logging::{self, LogLevel, LoggingService};
use reglex::pipeline::{self, Lexer};
use reglex::{Token, TokenChannel, TokenId};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "reglex", version)]
#[command(about = "Tokenize input with a grammar compiled into a single regex")]
struct Args {
    /// Grammar file (TOML, or JSON when it starts with `{`)
    grammar: PathBuf,

    /// Input file; stdin when omitted
    input: Option<PathBuf>,

    /// Read buffer size in bytes
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Stop at the first unmatched input instead of emitting invalid tokens
    #[arg(long)]
    fallback_error: bool,

    /// Run the tokenizer on a producer thread
    #[arg(long)]
    multithreaded: bool,

    /// Whitespace pattern replacing the grammar's whitespace rule
    #[arg(long, value_name = "REGEX")]
    whitespace: Option<String>,

    /// Fail when the grammar declares no whitespace rule
    #[arg(long)]
    require_whitespace_rule: bool,

    /// Print tokens as JSON lines
    #[arg(long)]
    json: bool,

    /// Print the compiled master pattern and exit
    #[arg(long)]
    show_pattern: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Take logging settings from REGLEX_LOGGING_* variables instead of -v
    #[arg(long, conflicts_with = "verbose")]
    env_logging: bool,
}

impl Args {
    fn preferences(&self) -> LexerPreferences {
        let mut preferences = LexerPreferences::default();
        if let Some(chunk_size) = self.chunk_size {
            preferences.chunk_size = chunk_size;
        }
        if let Some(whitespace) = &self.whitespace {
            preferences.custom_whitespace = Some(whitespace.clone());
        }
        preferences.use_fallback_error |= self.fallback_error;
        preferences.multithreaded |= self.multithreaded;
        preferences.require_whitespace_rule |= self.require_whitespace_rule;
        preferences
    }

    fn log_level(&self) -> LogLevel {
        match self.verbose {
            0 => LogLevel::Warning,
            1 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }
}

#[derive(Serialize)]
struct TokenRecord<'a> {
    id: TokenId,
    name: String,
    data: &'a str,
}

fn init_logging(args: &Args) -> Arc<LoggingService> {
    if args.env_logging {
        return logging::from_env();
    }

    let level = args.log_level();
    let filter = match level {
        LogLevel::Error => log::LevelFilter::Error,
        LogLevel::Warning => log::LevelFilter::Warn,
        LogLevel::Info => log::LevelFilter::Info,
        LogLevel::Debug => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_module("reglex", filter)
        .init();
    logging::log_facade(level)
}

fn main() -> ExitCode {
    let args = Args::parse();
    let logger = init_logging(&args);

    match run(&args, logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, logger: Arc<LoggingService>) -> Result<(), Box<dyn std::error::Error>> {
    let grammar = pipeline::load_grammar(&args.grammar, &logger)?;
    let lexer = Lexer::new(&grammar, &args.preferences(), logger)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if args.show_pattern {
        writeln!(out, "{}", lexer.lexicon().master_pattern)?;
        out.flush()?;
        return Ok(());
    }

    let input: Box<dyn Read + Send> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path).map_err(|err| {
            format!("cannot open input {}: {}", path.display(), err)
        })?)),
        None => Box::new(io::stdin()),
    };

    let count = write_tokens(lexer.channel(input), &grammar, args.json, &mut out)?;
    out.flush()?;
    log::info!(target: "reglex", "{} tokens", count);
    Ok(())
}

fn write_tokens<R, W>(
    channel: TokenChannel<R>,
    grammar: &GrammarModel,
    json: bool,
    out: &mut W,
) -> Result<usize, Box<dyn std::error::Error>>
where
    R: Read + Send + 'static,
    W: Write,
{
    let mut count = 0;
    for token in channel {
        let token = token?;
        writeln!(out, "{}", format_token(&token, grammar, json)?)?;
        count += 1;
    }
    Ok(count)
}

fn token_name(token: &Token, grammar: &GrammarModel) -> String {
    if token.is_invalid() {
        "INVALID".to_string()
    } else {
        grammar.display_name(token.id)
    }
}

fn format_token(token: &Token, grammar: &GrammarModel, json: bool) -> serde_json::Result<String> {
    let name = token_name(token, grammar);
    if json {
        let record = TokenRecord {
            id: token.id,
            name,
            data: &token.data,
        };
        serde_json::to_string(&record)
    } else {
        Ok(format!("{}\t{:?}", name, token.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reglex::{CompilerOptions, TokenizerOptions};
    use std::io::Cursor;

    fn grammar() -> GrammarModel {
        GrammarModel::new()
            .literal_rule(1, "ident", r"\w+")
            .literal_rule(2, "operator", "[;+]")
    }

    fn run_to_string(input: &str, json: bool) -> String {
        let grammar = grammar();
        let lexer =
            Lexer::with_options(&grammar, CompilerOptions::new(), TokenizerOptions::new()).unwrap();
        let mut out = Vec::new();
        write_tokens(
            lexer.channel(Cursor::new(input.as_bytes().to_vec())),
            &grammar,
            json,
            &mut out,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_plain_output() {
        assert_eq!(
            run_to_string("ab;c #", false),
            "ident\t\"ab\"\noperator\t\";\"\nident\t\"c\"\nINVALID\t\"#\"\n"
        );
    }

    #[test]
    fn test_json_output() {
        let output = run_to_string("x+", true);
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["name"], "ident");
        assert_eq!(lines[1]["id"], 2);
        assert_eq!(lines[1]["data"], "+");
    }

    #[test]
    fn test_cli_flags_override_preferences() {
        let args = Args::parse_from([
            "reglex",
            "lang.toml",
            "--chunk-size",
            "16",
            "--whitespace",
            "[ ]+",
            "--multithreaded",
            "-vv",
        ]);
        let preferences = args.preferences();

        assert_eq!(preferences.chunk_size, 16);
        assert_eq!(preferences.custom_whitespace.as_deref(), Some("[ ]+"));
        assert!(preferences.multithreaded);
        assert_eq!(args.log_level(), LogLevel::Debug);
        assert!(args.input.is_none());
        assert!(!args.env_logging);
    }

    #[test]
    fn test_env_logging_excludes_verbosity() {
        let args = Args::parse_from(["reglex", "lang.toml", "in.txt", "--env-logging"]);
        assert!(args.env_logging);
        assert_eq!(args.input, Some(PathBuf::from("in.txt")));

        assert!(Args::try_parse_from(["reglex", "lang.toml", "--env-logging", "-v"]).is_err());
    }
}
