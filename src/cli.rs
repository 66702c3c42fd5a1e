use clap::Parser;
use std::time::Duration;

use crate::io::HttpOptions;
use crate::zip::Index;

#[derive(Parser, Debug)]
#[command(name = "mapbundle")]
#[command(version)]
#[command(about = "Inspect map bundles from local files or HTTP URLs", long_about = None)]
#[command(after_help = "Examples:\n  \
  mapbundle -l oslo.mapbundle                       list members\n  \
  mapbundle -j oslo.mapbundle metadata.json         print a JSON member\n  \
  mapbundle -p https://example.com/oslo.mapbundle 'tiles/0/*' > tile.pbf")]
pub struct Cli {
    /// Bundle file path or HTTP URL
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Members to read, exact paths or `*`/`?` patterns (default: all)
    #[arg(value_name = "PATHS")]
    pub paths: Vec<String>,

    /// List members (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List members with size and data offset
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Write raw member bytes to stdout
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Print members parsed as JSON
    #[arg(short = 'j')]
    pub json: bool,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,

    /// HTTP retries on timeouts and connection errors, after the first attempt
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub retries: u32,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        self.file.starts_with("http://") || self.file.starts_with("https://")
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            timeout: Duration::from_secs(self.timeout),
            max_retries: self.retries,
        }
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.is_very_quiet() {
            "off"
        } else if self.is_quiet() {
            "error"
        } else {
            "warn"
        }
    }

    /// Whether `path` is selected by the positional patterns.
    pub fn selects(&self, path: &str) -> bool {
        self.paths.is_empty()
            || self.paths.iter().any(|pattern| {
                if has_glob_chars(pattern) {
                    glob_match(pattern, path)
                } else {
                    pattern == path
                }
            })
    }

    /// Members to print with `-p` or `-j`, in path order.
    ///
    /// Exact paths the bundle lacks are reported with a warning. With `-j` they
    /// are still appended, so that they print as `{}`; with `-p` they are
    /// skipped, as there are no bytes to write.
    pub fn members(&self, index: &Index) -> Vec<String> {
        let mut members: Vec<String> = index
            .paths()
            .into_iter()
            .filter(|path| self.selects(path))
            .map(str::to_owned)
            .collect();

        for pattern in &self.paths {
            if !has_glob_chars(pattern) && !index.contains(pattern) {
                tracing::warn!("{}: no such member", pattern);
                if self.json {
                    members.push(pattern.clone());
                }
            }
        }

        members
    }
}

/// Check if a pattern contains glob wildcard characters.
pub fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Glob matching supporting `*` (any run, including `/`) and `?` (one character).
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();

    fn do_match(pattern: &[char], text: &[char]) -> bool {
        match (pattern.first(), text.first()) {
            (None, None) => true,
            (Some('*'), _) => {
                do_match(&pattern[1..], text) || (!text.is_empty() && do_match(pattern, &text[1..]))
            }
            (Some('?'), Some(_)) => do_match(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if *p == *t => do_match(&pattern[1..], &text[1..]),
            _ => false,
        }
    }

    do_match(&pattern_chars, &text_chars)
}
