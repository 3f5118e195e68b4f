/// A `&'static Regex` compiled once, anchored at the start of the haystack
/// the way grammar leaves and ignorables are.
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
            regex::Regex::new(concat!(r"\A(?:", $pat, ")")).expect("static pattern is a valid regex")
        });
        &*RE
    }};
}
