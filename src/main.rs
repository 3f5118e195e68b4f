mod debug_report;

use std::io::{self, IsTerminal, Read};
use trellis::grammars::{arithmetic, assembly, json};
use trellis::{Options, ParseFlags, ParserPool, Tag, parse_verbose_with};

fn main() {
    env_logger::init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let ok = match config.grammar {
        Grammar::Arithmetic => run(&arithmetic::GRAMMAR, arithmetic::ENTRY, &config),
        Grammar::Json => run(&json::GRAMMAR, json::ENTRY, &config),
        Grammar::Assembly => run(&assembly::GRAMMAR, assembly::ENTRY, &config),
    };
    if !ok {
        std::process::exit(1);
    }
}

fn run<T: Tag>(pool: &ParserPool<T>, entry: &str, config: &CliConfig) -> bool {
    let rule = config.rule.as_deref().unwrap_or(entry);
    let mut options = Options::default();
    if !config.memoize {
        options.flags.remove(ParseFlags::MEMOIZE);
    }
    let res = parse_verbose_with(pool, rule, &config.input, &options);
    debug_report::print_run(pool, &config.input, &res, config.color);
    res.result.is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grammar {
    Arithmetic,
    Json,
    Assembly,
}

impl Grammar {
    fn from_name(name: &str) -> Result<Self, String> {
        match name {
            "arith" | "arithmetic" => Ok(Grammar::Arithmetic),
            "json" => Ok(Grammar::Json),
            "asm" | "assembly" => Ok(Grammar::Assembly),
            _ => Err(format!("error: unknown grammar '{name}' (expected arith, json or asm)")),
        }
    }
}

struct CliConfig {
    input: String,
    grammar: Grammar,
    rule: Option<String>,
    memoize: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut grammar = Grammar::Arithmetic;
    let mut rule: Option<String> = None;
    let mut memoize = true;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("trellis {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--no-memo" => memoize = false,
            "--grammar" | "-g" => {
                let value = args.next().ok_or_else(|| "error: --grammar expects a value".to_string())?;
                grammar = Grammar::from_name(&value)?;
            }
            "--rule" | "-r" => {
                let value = args.next().ok_or_else(|| "error: --rule expects a value".to_string())?;
                rule = Some(value);
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                set_input(&mut input, value)?;
            }
            "--file" | "-f" => {
                let path = args.next().ok_or_else(|| "error: --file expects a path".to_string())?;
                set_input(&mut input, read_file_input(&path)?)?;
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    set_input(&mut input, rest)?;
                }
                break;
            }
            _ if arg.starts_with("--grammar=") => {
                grammar = Grammar::from_name(arg.trim_start_matches("--grammar="))?;
            }
            _ if arg.starts_with("--rule=") => {
                rule = Some(arg.trim_start_matches("--rule=").to_string());
            }
            _ if arg.starts_with("--input=") => {
                set_input(&mut input, arg.trim_start_matches("--input=").to_string())?;
            }
            _ if arg.starts_with("--file=") => {
                set_input(&mut input, read_file_input(arg.trim_start_matches("--file="))?)?;
            }
            _ if arg.starts_with('-') && arg.len() > 1 && !arg[1..].starts_with(|c: char| c.is_ascii_digit()) => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                set_input(&mut input, rest)?;
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, grammar, rule, memoize, color })
}

fn set_input(input: &mut Option<String>, value: String) -> Result<(), String> {
    if input.is_some() {
        return Err("error: input provided multiple times".to_string());
    }
    *input = Some(value);
    Ok(())
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn read_file_input(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|err| format!("error: failed to read '{path}': {err}"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "trellis {version}

Parse text with one of the bundled grammars and print the tree.

Usage:
  trellis [OPTIONS] [--] <input...>
  trellis [OPTIONS] --input <text>
  trellis [OPTIONS] --file <path>

Options:
  -g, --grammar <name>       Grammar to use: arith, json or asm. Default: arith
  -r, --rule <name>          Entry rule. Default: the grammar's own entry rule.
  -i, --input <text>         Input text to parse. If omitted, reads remaining args
                             or stdin when no args are provided.
  -f, --file <path>          Read input from a file.
  --no-memo                  Disable memoization.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Logging:
  RUST_LOG=trellis=debug     Grammar build summaries.
  RUST_LOG=trellis=trace     Every rule entry and exit.

Exit codes:
  0  Input parsed completely.
  1  Parse failure.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
