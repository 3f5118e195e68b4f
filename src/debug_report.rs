use trellis::{Ast, ParseDetails, ParseError, ParseResultVerbose, ParserPool, Tag};

/// Tree lines printed before the rest is summarized.
const MAX_TREE_LINES: usize = 200;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run<T: Tag>(pool: &ParserPool<T>, input: &str, res: &ParseResultVerbose<T>, color: bool) {
    let palette = ansi::Palette::new(color);
    let details = &res.details;
    let preview = trellis::cursor::snippet_at(input, 0);
    println!(
        "\n{}",
        palette.bold(palette.paint(format!("⚙  Parsing: \"{}\" with rule `{}`", preview, details.rule), ansi::CYAN))
    );

    if !details.issues.is_empty() {
        println!("\n{}", palette.paint("━━━ Grammar Issues ━━━", ansi::GRAY));
        for issue in &details.issues {
            let color = if issue.is_fatal() { ansi::RED } else { ansi::YELLOW };
            println!("  {} {}", palette.paint("•", color), issue);
            if let Some(rule) = pool.rule_id(issue.rule()) {
                println!("    {}", palette.dim(format!("{} ::= {}", issue.rule(), pool.node(pool.rule_root(rule)).describe())));
            }
        }
    }

    match &res.result {
        Ok(tree) => {
            println!("\n{}", palette.paint("━━━ Tree ━━━", ansi::GRAY));
            print_tree(tree, &palette);
        }
        Err(err) => {
            println!("\n{}", palette.paint("━━━ Error ━━━", ansi::GRAY));
            print_error(err, &palette);
        }
    }

    println!("\n{}", palette.paint("━━━ Engine ━━━", ansi::GRAY));
    print_engine(details, &palette);

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Consumed: {}",
        palette.paint(format!("{:?}", details.total), ansi::GREEN),
        palette.dim(format!("{}/{} bytes", details.consumed, details.input_len)),
    );
    println!();
}

fn print_tree<T: Tag>(tree: &Ast<T>, palette: &ansi::Palette) {
    let mut stack = vec![(tree, 0usize)];
    let mut printed = 0;
    while let Some((node, depth)) = stack.pop() {
        if printed == MAX_TREE_LINES {
            let rest = node.walk().count() + stack.iter().map(|(n, _)| n.walk().count()).sum::<usize>();
            println!("  {}", palette.dim(format!("... +{rest} more nodes")));
            return;
        }
        let tag = match node.tag() {
            Some(tag) => palette.paint(format!("{tag:?}"), ansi::BLUE),
            None => palette.dim("_"),
        };
        match node.capture() {
            Some(capture) => println!(
                "  {}{} {} {}",
                "  ".repeat(depth),
                tag,
                palette.bold(palette.paint(format!("{:?}", &*capture.text), ansi::GREEN)),
                palette.paint(format!("{}..{}", capture.span.start, capture.span.end), ansi::YELLOW),
            ),
            None => println!("  {}{}", "  ".repeat(depth), tag),
        }
        printed += 1;
        stack.extend(node.children().iter().rev().map(|child| (child, depth + 1)));
    }
}

fn print_error(err: &ParseError, palette: &ansi::Palette) {
    println!("  {}", palette.bold(palette.paint(err.to_string(), ansi::RED)));
    if let Some(pos) = err.position() {
        println!("  {} line {}, column {} (byte {})", palette.dim("at"), pos.line, pos.column, pos.offset);
    }
    if matches!(err, ParseError::NoMatch { .. }) {
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • The input has a syntax error near the furthest position");
        println!("  • The wrong grammar or entry rule was selected (see --grammar, --rule)");
        println!("\n{}", palette.dim("  Tip: Set RUST_LOG=trellis=trace to see every rule entry and exit"));
    }
}

fn print_engine(details: &ParseDetails, palette: &ansi::Palette) {
    let m = &details.engine;
    println!(
        "  {} {}  {} {}  {} {}/{}",
        palette.dim("steps:"),
        palette.paint(m.steps.to_string(), ansi::CYAN),
        palette.dim("resumes:"),
        palette.paint(m.resumes.to_string(), ansi::CYAN),
        palette.dim("leaf matches:"),
        palette.paint(m.leaf_matches.to_string(), ansi::GREEN),
        m.leaf_attempts,
    );
    println!(
        "  {} {}  {} {}  {} {}  {} {}",
        palette.dim("memo hits:"),
        palette.paint(m.memo_hits.to_string(), ansi::GREEN),
        palette.dim("misses:"),
        palette.paint(m.memo_misses.to_string(), ansi::YELLOW),
        palette.dim("entries:"),
        m.memo_entries,
        palette.dim("recursion cuts:"),
        m.recursion_cuts,
    );
    println!(
        "  {} work {}  frames {}  results {}",
        palette.dim("max stacks:"),
        palette.paint(m.max_work.to_string(), ansi::BLUE),
        palette.paint(m.max_frames.to_string(), ansi::BLUE),
        palette.paint(m.max_results.to_string(), ansi::BLUE),
    );
    if m.zero_width_stops > 0 {
        println!("  {} {}", palette.paint("zero-width repetition stops:", ansi::YELLOW), m.zero_width_stops);
    }
}
