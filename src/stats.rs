//! Translation hit/miss statistics and the summary table

use std::fmt::Write as _;

use ansi_term::Colour;

/// Ratio from which a locale counts as well translated.
const GOOD_RATIO_BASIS_POINTS: u64 = 8_000;

/// Hit/miss counters of one locale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationStats {
    pub hits: u64,
    pub misses: u64,
}

impl TranslationStats {
    pub const fn record(&mut self, found: bool) {
        if found {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.hits + self.misses
    }

    /// Translated share in hundredths of a percent, rounded half up.
    ///
    /// `0` when nothing was looked up.
    #[must_use]
    pub const fn ratio_basis_points(&self) -> u64 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        (self.hits * 20_000 + total) / (2 * total)
    }

    /// Percentage with two decimals, e.g. `83.33`.
    #[must_use]
    pub fn percent_translated(&self) -> String {
        let basis_points = self.ratio_basis_points();
        format!("{}.{:02}", basis_points / 100, basis_points % 100)
    }
}

impl std::ops::AddAssign for TranslationStats {
    fn add_assign(&mut self, other: Self) {
        self.hits += other.hits;
        self.misses += other.misses;
    }
}

/// Stats row of the summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleStats {
    pub locale: String,
    pub stats: TranslationStats,
}

impl LocaleStats {
    #[must_use]
    pub fn new(locale: impl Into<String>, stats: TranslationStats) -> Self {
        Self { locale: locale.into(), stats }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStyle {
    Plain,
    /// ANSI colours for terminals
    Colored,
}

const HEADER: [&str; 5] = ["Locale", "Hits", "Misses", "% translated", "Total"];

/// A cell: plain text (for width) and an optional colour.
struct Cell {
    text: String,
    colour: Option<Colour>,
}

impl Cell {
    const fn plain(text: String) -> Self {
        Self { text, colour: None }
    }

    const fn coloured(text: String, colour: Colour) -> Self {
        Self { text, colour: Some(colour) }
    }

    fn width(&self) -> usize {
        self.text.chars().count()
    }
}

fn row_cells(row: &LocaleStats) -> [Cell; 5] {
    let stats = row.stats;
    let misses_colour = if stats.misses > 0 { Colour::Yellow } else { Colour::Green };
    let ratio_colour = if stats.ratio_basis_points() >= GOOD_RATIO_BASIS_POINTS {
        Colour::Green
    } else {
        Colour::Yellow
    };

    [
        Cell::plain(row.locale.clone()),
        Cell::coloured(stats.hits.to_string(), Colour::Green),
        Cell::coloured(stats.misses.to_string(), misses_colour),
        Cell::coloured(format!("{}%", stats.percent_translated()), ratio_colour),
        Cell::plain(stats.total().to_string()),
    ]
}

/// Render the per-locale summary as an ASCII table.
///
/// The first column is left aligned, the others centred.
#[must_use]
pub fn report(title: &str, rows: &[LocaleStats], style: ReportStyle) -> String {
    let header = HEADER.map(|text| Cell::plain(text.to_string()));
    let body: Vec<[Cell; 5]> = rows.iter().map(row_cells).collect();

    let mut widths = header.each_ref().map(Cell::width);
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.width());
        }
    }

    let separator = border_line(&widths);
    let mut out = String::new();
    let _ = writeln!(out, "{}", title_line(&separator, title));
    push_row(&mut out, &header, &widths, ReportStyle::Plain);
    let _ = writeln!(out, "{separator}");
    for cells in &body {
        push_row(&mut out, cells, &widths, style);
    }
    let _ = writeln!(out, "{separator}");
    out
}

fn border_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line
}

/// The top border with the title embedded after the first corner.
fn title_line(border: &str, title: &str) -> String {
    let title_width = title.chars().count();
    let border_width = border.chars().count();
    if title.is_empty() || title_width + 2 > border_width {
        return border.to_string();
    }
    let rest: String = border.chars().skip(title_width + 1).collect();
    format!("+{title}{rest}")
}

fn push_row(out: &mut String, cells: &[Cell], widths: &[usize], style: ReportStyle) {
    out.push('|');
    for (column, (cell, width)) in cells.iter().zip(widths).enumerate() {
        let padding = width.saturating_sub(cell.width());
        let (left, right) = if column == 0 { (0, padding) } else { (padding / 2, padding - padding / 2) };

        let text = match (style, cell.colour) {
            (ReportStyle::Colored, Some(colour)) => colour.paint(cell.text.as_str()).to_string(),
            _ => cell.text.clone(),
        };
        let _ = write!(out, " {}{text}{} |", " ".repeat(left), " ".repeat(right));
    }
    out.push('\n');
}
