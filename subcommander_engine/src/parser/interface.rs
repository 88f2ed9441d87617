use crate::parser::UsageError;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

#[derive(Debug)]
pub(crate) struct PaddingWidth(usize);

impl PaddingWidth {
    pub(crate) fn new(width: usize) -> Result<Self, ()> {
        // padding must be at least 1
        if width >= 1 {
            Ok(PaddingWidth(width))
        } else {
            Err(())
        }
    }
}

#[derive(Debug)]
pub(crate) struct LeftWidth(usize);

impl LeftWidth {
    pub(crate) fn new(width: usize) -> Result<Self, ()> {
        // left must be at least 1
        if width >= 1 {
            Ok(LeftWidth(width))
        } else {
            Err(())
        }
    }
}

#[derive(Debug)]
pub(crate) struct MiddleWidth(usize);

impl MiddleWidth {
    pub(crate) fn new(width: usize) -> Result<Self, ()> {
        // middle must be at least 2 (so we can hyphenate)
        if width >= 2 {
            Ok(MiddleWidth(width))
        } else {
            Err(())
        }
    }
}

#[derive(Debug)]
pub(crate) struct TotalWidth(pub usize);

/// Lays out a two column table: a left label and a wrapped middle description.
#[derive(Debug)]
pub(crate) struct ColumnRenderer {
    padding: PaddingWidth,
    left: LeftWidth,
    middle: MiddleWidth,
}

// Target 95% of the total width, so the renderer never uses the full space.
const TARGET_TOTAL_FACTOR: f64 = 0.95;

// Assuming an average word length of 5, 17 allows precisely 3 words with a space between them.
pub(crate) const MINIMUM_MIDDLE_WIDTH: usize = 17;

impl ColumnRenderer {
    /// Produce a renderer which picks the middle width to fit within the total width.
    pub(crate) fn guided(
        padding: PaddingWidth,
        left: LeftWidth,
        middle: MiddleWidth,
        total_width: TotalWidth,
    ) -> Self {
        let non_middle = left.0 + padding.0;
        let target_total_width = (total_width.0 as f64 * TARGET_TOTAL_FACTOR) as usize;
        let guided_middle = std::cmp::max(middle.0, MINIMUM_MIDDLE_WIDTH);

        let selected = if guided_middle + non_middle <= target_total_width {
            guided_middle
        } else if non_middle < total_width.0 {
            std::cmp::max(total_width.0 - non_middle, MINIMUM_MIDDLE_WIDTH)
        } else {
            MINIMUM_MIDDLE_WIDTH
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Left column {non_middle} within total {total}; selecting middle: {selected}.",
                total = total_width.0
            );
        }

        Self::new(padding, left, MiddleWidth(selected))
    }

    pub(crate) fn new(padding: PaddingWidth, left: LeftWidth, middle: MiddleWidth) -> Self {
        Self {
            padding,
            left,
            middle,
        }
    }

    pub(crate) fn render(&self, indent: usize, left: &str, middle: &str) -> Vec<String> {
        let padding = format!("{:width$}", "", width = self.padding.0);
        let left_width = self.left.0;
        let middle_width = std::cmp::max(self.middle.0.saturating_sub(indent), 2);
        let mut lines: Vec<String> = chunk(middle, middle_width)
            .into_iter()
            .enumerate()
            .map(|(i, part)| {
                let label = if i == 0 { left } else { "" };
                format!("{:indent$}{label:left_width$}{padding}{part}", "")
            })
            .collect();

        if lines.is_empty() {
            lines.push(format!("{:indent$}{left}", ""));
        }

        lines
    }
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
        let word_length = word.chars().count();

        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if current.chars().count() + word_length + 1 <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let characters: Vec<char> = word.chars().collect();
    let increment = width - 1;
    let mut start = 0;

    while characters.len() - start > width {
        let piece: String = characters[start..start + increment].iter().collect();
        lines.push(format!("{piece}-"));
        start += increment;
    }

    current.extend(characters[start..].iter());
}

/// The output seam: everything the application shows the user goes through here.
pub(crate) trait UserInterface {
    fn print(&self, message: String);
    fn print_warning(&self, message: String);
    fn print_error(&self, error: &UsageError);
    fn print_unhandled(&self, error: &dyn std::error::Error);
}

#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_warning(&self, message: String) {
        eprintln!("Warning: {message}");
    }

    fn print_error(&self, error: &UsageError) {
        eprintln!("{}", render_error(error));
    }

    fn print_unhandled(&self, error: &dyn std::error::Error) {
        eprintln!("{}", render_unhandled(error));
    }
}

pub(crate) fn render_error(error: &UsageError) -> String {
    match error.usage() {
        Some(usage) => format!("Error: {error}\n{usage}"),
        None => format!("Error: {error}"),
    }
}

pub(crate) fn render_unhandled(error: &dyn std::error::Error) -> String {
    let mut out = format!("Unhandled error: {error}");
    let mut source = error.source();

    while let Some(cause) = source {
        out.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }

    out
}
