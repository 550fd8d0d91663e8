use anyhow::{Context, Result};
use crossterm::style::Stylize;
use markdown_streamline_config::Config;
use markdown_streamline_engine::{
    EmitSegment, FenceState, FragmentFeed, Heading, StreamSession,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::{env, process, thread, time::Duration};

/// Styles finalized segments onto the terminal as they arrive.
///
/// Plain text is buffered per line so heading lines can be styled whole;
/// inline code and fence content carry their own tags and are styled
/// directly.
struct Renderer<W: Write> {
    out: W,
    line: String,
    in_fence: bool,
}

impl<W: Write> Renderer<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            line: String::new(),
            in_fence: false,
        }
    }

    fn render(&mut self, seg: &EmitSegment) -> Result<()> {
        match &seg.state {
            FenceState::Plain => {
                self.in_fence = false;
                for piece in seg.text.split_inclusive('\n') {
                    self.line.push_str(piece);
                    if piece.ends_with('\n') {
                        self.flush_line()?;
                    }
                }
            }
            FenceState::InlineCode { .. } => {
                self.in_fence = false;
                self.line.push_str(&seg.text.as_str().cyan().to_string());
            }
            FenceState::InFence { lang } => {
                if !self.in_fence {
                    self.enter_fence(lang.as_deref())?;
                }
                write!(self.out, "{}", seg.text.as_str().green())?;
                self.out.flush()?;
            }
        }
        Ok(())
    }

    fn enter_fence(&mut self, lang: Option<&str>) -> Result<()> {
        let mid_line = !self.line.is_empty();
        self.flush_line()?;
        if mid_line {
            writeln!(self.out)?;
        }
        if let Some(lang) = lang {
            writeln!(self.out, "{}", format!("[{lang}]").dim())?;
        }
        self.in_fence = true;
        Ok(())
    }

    /// Writes out the buffered line, bold when it is a heading.
    fn flush_line(&mut self) -> Result<()> {
        if self.line.is_empty() {
            return Ok(());
        }
        let line = std::mem::take(&mut self.line);
        if Heading::level(&line).is_some() {
            write!(self.out, "{}", line.as_str().bold())?;
        } else {
            write!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.flush_line()?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

struct Options {
    fixture: PathBuf,
    separator: String,
    delay: Duration,
}

fn parse_args(config: Option<Config>) -> Options {
    let args: Vec<String> = env::args().collect();
    let config = config.unwrap_or_default();

    let mut fixture = config.fixture_path;
    let mut separator = config.separator;
    let mut delay_ms = config.fragment_delay_ms;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--separator" | "-s" => {
                i += 1;
                match args.get(i) {
                    Some(tok) => separator = tok.clone(),
                    None => usage_exit(&args[0]),
                }
            }
            "--delay" | "-d" => {
                i += 1;
                match args.get(i).and_then(|v| v.parse().ok()) {
                    Some(ms) => delay_ms = ms,
                    None => usage_exit(&args[0]),
                }
            }
            flag if flag.starts_with('-') => usage_exit(&args[0]),
            path => fixture = Some(PathBuf::from(path)),
        }
        i += 1;
    }

    let Some(fixture) = fixture else {
        eprintln!("Error: No fixture path provided and none set in config");
        eprintln!(
            "Or set fixture_path in {}",
            Config::config_path().display()
        );
        usage_exit(&args[0]);
    };

    Options {
        fixture,
        separator,
        delay: Duration::from_millis(delay_ms),
    }
}

fn usage_exit(program: &str) -> ! {
    eprintln!("Usage: {program} [fixture-path] [--separator <token>] [--delay <ms>]");
    process::exit(1);
}

fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    let options = parse_args(config);

    let feed = FragmentFeed::from_file(&options.fixture, &options.separator)
        .with_context(|| format!("failed to load fixture {}", options.fixture.display()))?;

    let mut session = StreamSession::new();
    let mut renderer = Renderer::new(io::stdout());

    for fragment in feed {
        for segment in session.push(&fragment)? {
            renderer.render(&segment)?;
        }
        if !options.delay.is_zero() {
            thread::sleep(options.delay);
        }
    }
    for segment in session.finish()? {
        renderer.render(&segment)?;
    }
    renderer.finish()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_streamline_engine::DEFAULT_SEPARATOR;

    fn render_all(source: &str) -> String {
        let mut session = StreamSession::new();
        let mut renderer = Renderer::new(Vec::new());
        for fragment in FragmentFeed::from_fixture(source, DEFAULT_SEPARATOR) {
            for segment in session.push(&fragment).unwrap() {
                renderer.render(&segment).unwrap();
            }
        }
        for segment in session.finish().unwrap() {
            renderer.render(&segment).unwrap();
        }
        renderer.finish().unwrap();
        String::from_utf8(renderer.out).unwrap()
    }

    #[test]
    fn renders_fence_content_without_delimiters() {
        let out = render_all("before ``<<SPLIT>>`rust\ncode\n``` after");
        assert!(out.contains("code"));
        assert!(!out.contains("```"));
    }

    #[test]
    fn announces_fence_language() {
        let out = render_all("```rust\nfn x() {}\n```\n");
        assert!(out.contains("[rust]"));
    }

    #[test]
    fn plain_text_survives_verbatim_when_unstyled() {
        let out = render_all("hello stream");
        assert!(out.contains("hello stream"));
    }
}
