use std::collections::BTreeMap;

use colored::{Color, ColoredString, Colorize};
use crossterm::terminal;

use crate::report::TestReport;
use crate::testing::Verdict;

#[macro_export]
macro_rules! print_success {
    ($fmt:literal, $($e:tt)*) => {
        use ::colored::Colorize as _;
        println!("{}", format!($fmt, $($e)*).green())
    }
}

pub fn is_truecolor_supported() -> bool {
    let Ok(v) = std::env::var("COLORTERM") else {
        return false
    };
    matches!(v.as_str(), "truecolor" | "24bit")
}

pub trait ColorTheme {
    fn color(&self) -> Color;
}

impl ColorTheme for log::Level {
    fn color(&self) -> Color {
        use log::Level::*;
        match self {
            Error => Color::BrightRed,
            Warn => Color::BrightYellow,
            Info => Color::Cyan,
            Debug => Color::Magenta,
            Trace => Color::Blue,
        }
    }
}

impl ColorTheme for Verdict {
    fn color(&self) -> Color {
        use Verdict::*;
        if !self::is_truecolor_supported() {
            return match self {
                Accepted => Color::Green,
                WrongAnswer => Color::Yellow,
                TimeLimitExceeded | MemoryLimitExceeded | OutputLimitExceeded => Color::Red,
                RuntimeError => Color::Magenta,
                CompileError | InternalError => Color::Blue,
            };
        }

        let (r, g, b) = match self {
            Accepted => (30, 180, 40),
            WrongAnswer => (210, 138, 4),
            TimeLimitExceeded | MemoryLimitExceeded | OutputLimitExceeded => (220, 42, 42),
            RuntimeError => (171, 40, 200),
            CompileError | InternalError => (60, 90, 200),
        };
        Color::TrueColor { r, g, b }
    }
}

pub fn judge_icon(verdict: Verdict) -> ColoredString {
    let fg = if is_truecolor_supported() {
        Color::TrueColor {
            r: 255,
            g: 255,
            b: 255,
        }
    } else {
        Color::BrightBlack
    };
    format!(" {:<3} ", verdict.to_string())
        .on_color(verdict.color())
        .bold()
        .color(fg)
}

pub fn test_result_line(report: &TestReport) -> String {
    format!(
        "Testcase {} ... {} [{}ms]",
        report.name,
        judge_icon(report.verdict),
        report.elapsed_millis(),
    )
}

pub fn print_test_result_summary(results: &[TestReport]) {
    let bar = "-".repeat(5);
    print!("{} ", bar);

    let count: BTreeMap<String, (Verdict, usize)> =
        results.iter().fold(BTreeMap::new(), |mut count, r| {
            count.entry(r.verdict.to_string()).or_insert((r.verdict, 0)).1 += 1;
            count
        });

    let num_total_test = results.len();
    let num_passed = results.iter().filter(|r| r.verdict.is_accepted()).count();
    let num_failed = num_total_test - num_passed;

    if num_passed == num_total_test {
        let msg = format!("All {} tests passed ✨", num_total_test);
        print!("{}", msg.green());
    } else {
        let summary_msg = if num_passed > 0 {
            format!("{}/{} tests failed 💣", num_failed, num_total_test)
        } else {
            format!("All {} tests failed 💀", num_total_test)
        };

        let detail_msg = count
            .values()
            .filter(|(verdict, _)| !verdict.is_accepted())
            .map(|&(verdict, cnt)| {
                format!(
                    "{}{}{}",
                    self::judge_icon(verdict),
                    "x".dimmed(),
                    cnt.to_string().bold().bright_white(),
                )
            })
            .collect::<Vec<String>>()
            .join(", ");

        print!("{} ({})", summary_msg.bright_red(), detail_msg);
    }

    println!(" {}", bar);
}

const BOLD_LINE: &str = "━";
const THIN_LINE: &str = "─";

pub fn print_test_result_detail(res: &TestReport, show_input: bool) {
    let (cols, _) = terminal::size().unwrap_or((40, 40));
    let cols = cols as usize;

    let bold_bar = BOLD_LINE.repeat(cols).blue().bold();

    let exit_status = res
        .exit_status
        .map_or_else(|| "-".to_owned(), |code| code.to_string());
    println!(
        "\n{}: {} [{}ms] (exit status: {})\n{}",
        res.name.color(Color::BrightYellow).bold(),
        self::judge_icon(res.verdict),
        res.elapsed_millis(),
        exit_status,
        bold_bar,
    );

    if let Some(msg) = &res.message {
        println!("{}", msg.bright_red());
    }

    if show_input {
        print_sub_title("[input]", cols);
        print_lines(&res.input);
    }

    print_sub_title("[truth-answer]", cols);
    print_lines(&res.expected);

    print_sub_title("[stdout]", cols);
    print_lines(&res.output);

    println!("{}", bold_bar);
}

fn print_sub_title(s: &str, cols: usize) {
    println!(
        "{}{}",
        s.cyan().bold(),
        THIN_LINE
            .repeat(cols.saturating_sub(s.len() + 1))
            .bright_black(),
    )
}

fn print_lines(entire_str: &str) {
    let lines: Vec<_> = entire_str.lines().collect();
    if lines.is_empty() {
        println!("{}", "<EMPTY>".magenta().dimmed());
        return;
    }
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim_end();
        print!("{}", trimmed);

        let num_trailing_whitespace = line.len() - trimmed.len();
        if num_trailing_whitespace > 0 {
            print!(
                "{}{}",
                " ".repeat(num_trailing_whitespace).on_red(),
                "(Trailing whitespace)".bright_red().bold()
            );
        }

        let is_last_line = i + 1 == lines.len();
        if is_last_line && !entire_str.ends_with('\n') {
            print!("{}", " Missing new line ".on_yellow().black().bold());
        }

        println!();
    }
}
