//! Terminal rendering for the markdown produced by the core display layer.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

const RESET: &str = "\x1b[0m";

/// How a single line of plan or workload output is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineStyle {
    /// `# Training plan`, `# Catalog`, activity titles
    Title,
    /// `## 2. Small-sided game: Rondo`, one per session stage
    Stage,
    /// Any other heading
    Section,
    /// `> No suitable activity found for this stage.`
    Notice,
    /// `- Risk zone: ...`, coloured by how risky the zone is
    Risk(&'static str),
    Body,
}

impl LineStyle {
    fn of(line: &str) -> Self {
        if line.starts_with("# ") {
            LineStyle::Title
        } else if let Some(heading) = line.strip_prefix("## ") {
            if heading.starts_with(|c: char| c.is_ascii_digit()) {
                LineStyle::Stage
            } else {
                LineStyle::Section
            }
        } else if line.starts_with('#') {
            LineStyle::Section
        } else if line.starts_with("> ") {
            LineStyle::Notice
        } else if let Some(zone) = line.strip_prefix("- Risk zone: ") {
            LineStyle::Risk(Self::risk_color(zone))
        } else {
            LineStyle::Body
        }
    }

    fn risk_color(zone: &str) -> &'static str {
        if zone.contains("High risk") {
            "\x1b[1;31m"
        } else if zone.contains("Elevated") {
            "\x1b[33m"
        } else if zone.contains("Optimal") {
            "\x1b[32m"
        } else {
            "\x1b[36m"
        }
    }

    /// ANSI prefix for lines printed without termimad.
    fn ansi(self) -> Option<&'static str> {
        match self {
            LineStyle::Title => Some("\x1b[1;32m"),
            LineStyle::Stage => Some("\x1b[1;36m"),
            LineStyle::Section => Some("\x1b[32m"),
            LineStyle::Notice => Some("\x1b[31m"),
            LineStyle::Risk(color) => Some(color),
            LineStyle::Body => None,
        }
    }
}

/// Renders markdown with termimad, or prints it verbatim with `--no-color`.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Print markdown text to stdout.
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        for line in markdown.lines() {
            match LineStyle::of(line).ansi() {
                Some(color) => println!("{color}{line}{RESET}"),
                None => {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
