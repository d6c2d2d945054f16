use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Color as CtColor, Stylize};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;
use zene_catalog::catalog::OpOutcome;

// ═══════════════════════════════════════════════════════════════════════════════
// Clap Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_styles() -> Styles {
    clap::builder::Styles::styled()
        .usage(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .header(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .literal(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .invalid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Color Palette
// ═══════════════════════════════════════════════════════════════════════════════

pub mod colors {
    use crossterm::style::Color;

    pub const AMBER: Color = Color::Rgb {
        r: 255,
        g: 191,
        b: 0,
    };
    pub const TEAL: Color = Color::Rgb {
        r: 0,
        g: 200,
        b: 180,
    };
    pub const VIOLET: Color = Color::Rgb {
        r: 160,
        g: 120,
        b: 255,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 0,
        g: 230,
        b: 118,
    };
    pub const ORANGE: Color = Color::Rgb {
        r: 255,
        g: 140,
        b: 0,
    };
    pub const RED: Color = Color::Rgb {
        r: 255,
        g: 85,
        b: 85,
    };
    pub const BLUE: Color = Color::Rgb {
        r: 100,
        g: 149,
        b: 237,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Box Drawing Characters
// ═══════════════════════════════════════════════════════════════════════════════

pub mod box_chars {
    pub const DOUBLE_TOP_LEFT: &str = "╔";
    pub const DOUBLE_TOP_RIGHT: &str = "╗";
    pub const DOUBLE_BOTTOM_LEFT: &str = "╚";
    pub const DOUBLE_BOTTOM_RIGHT: &str = "╝";
    pub const DOUBLE_HORIZONTAL: &str = "═";
    pub const DOUBLE_VERTICAL: &str = "║";

    pub const SINGLE_HORIZONTAL: &str = "─";

    pub const ROUND_TOP_LEFT: &str = "╭";
    pub const ROUND_TOP_RIGHT: &str = "╮";
    pub const ROUND_BOTTOM_LEFT: &str = "╰";
    pub const ROUND_BOTTOM_RIGHT: &str = "╯";

    pub const BULLET: &str = "●";
    pub const BULLET_EMPTY: &str = "○";
    pub const DIAMOND: &str = "◆";
    pub const CHECK: &str = "✓";
    pub const CROSS_MARK: &str = "✗";

    /// Tree glyph prefixes used by album reports.
    pub const TREE_PREFIXES: [&str; 3] = ["┌─", "├─", "└─"];
}

// ═══════════════════════════════════════════════════════════════════════════════
// Banner
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_banner() {
    let banner = r#"
    ███████╗███████╗███╗   ██╗███████╗
    ╚══███╔╝██╔════╝████╗  ██║██╔════╝
      ███╔╝ █████╗  ██╔██╗ ██║█████╗
     ███╔╝  ██╔══╝  ██║╚██╗██║██╔══╝
    ███████╗███████╗██║ ╚████║███████╗
    ╚══════╝╚══════╝╚═╝  ╚═══╝╚══════╝
"#;

    let gradient_colors = [
        colors::AMBER,
        colors::AMBER,
        colors::ORANGE,
        colors::ORANGE,
        colors::VIOLET,
        colors::VIOLET,
        colors::TEAL,
    ];

    for (i, line) in banner.lines().enumerate() {
        let color = gradient_colors.get(i).unwrap_or(&colors::AMBER);
        println!("{}", line.with(*color).bold());
    }

    println!(
        "{}",
        "  ═══════════════  MUSIC CATALOG CONSOLE  ═══════════════".with(colors::DIM)
    );
    println!();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Status Indicators
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_success(message: &str) {
    println!(
        " {} {}",
        box_chars::CHECK.to_string().with(colors::GREEN).bold(),
        message.with(colors::GREEN)
    );
}

pub fn print_error(message: &str) {
    println!(
        " {} {}",
        box_chars::CROSS_MARK.to_string().with(colors::RED).bold(),
        message.with(colors::RED)
    );
}

pub fn print_warning(message: &str) {
    println!(
        " {} {}",
        "⚠".with(colors::ORANGE).bold(),
        message.with(colors::ORANGE)
    );
}

pub fn print_info(message: &str) {
    println!(
        " {} {}",
        "ℹ".with(colors::BLUE).bold(),
        message.with(colors::BLUE)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Section Headers
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_section_header(title: &str) {
    let width: usize = 60;
    let title_len = title.width();
    let padding = width.saturating_sub(title_len + 4) / 2;

    println!();
    print!("{}", box_chars::ROUND_TOP_LEFT.with(colors::AMBER));
    print!(
        "{}",
        box_chars::SINGLE_HORIZONTAL
            .repeat(padding)
            .with(colors::AMBER)
    );
    print!(
        " {} ",
        title.with(colors::AMBER).bold().attribute(Attribute::Italic)
    );
    print!(
        "{}",
        box_chars::SINGLE_HORIZONTAL
            .repeat(width.saturating_sub(title_len + 4 + padding))
            .with(colors::AMBER)
    );
    println!("{}", box_chars::ROUND_TOP_RIGHT.with(colors::AMBER));
}

pub fn print_section_footer() {
    let width = 60;
    print!("{}", box_chars::ROUND_BOTTOM_LEFT.with(colors::AMBER));
    print!(
        "{}",
        box_chars::SINGLE_HORIZONTAL
            .repeat(width)
            .with(colors::AMBER)
    );
    println!("{}", box_chars::ROUND_BOTTOM_RIGHT.with(colors::AMBER));
    println!();
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        box_chars::BULLET.with(colors::VIOLET),
        format!("{}:", key).with(colors::DIM),
        value.with(colors::WHITE)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Operation Outcomes
// ═══════════════════════════════════════════════════════════════════════════════

/// Report lines keep their layout; only tree glyphs and headers get colour.
fn print_report_line(line: &str) {
    let trimmed = line.trim_start();
    if let Some(prefix) = box_chars::TREE_PREFIXES
        .iter()
        .find(|p| trimmed.starts_with(*p))
    {
        let indent = &line[..line.len() - trimmed.len()];
        let rest = &trimmed[prefix.len()..];
        println!("{}{}{}", indent, prefix.with(colors::DIM), rest.with(colors::WHITE));
    } else if trimmed.starts_with("Album:") {
        println!("{}", line.with(colors::TEAL).bold());
    } else {
        println!("{}", line);
    }
}

/// Failures print in red, not-found and no-op outcomes as warnings,
/// successful writes in green and reports as plain text.
pub fn print_outcome(outcome: &OpOutcome) {
    if outcome.is_failure() {
        for line in outcome.text.lines() {
            print_error(line);
        }
    } else if outcome.status == 0 {
        for line in outcome.text.lines() {
            print_warning(line);
        }
    } else if outcome.is_report() {
        println!();
        for line in outcome.text.lines() {
            print_report_line(line);
        }
        println!();
    } else {
        for line in outcome.text.lines() {
            print_success(line);
        }
    }
}

pub fn print_empty_selection() {
    println!(
        "  {} {}",
        box_chars::BULLET_EMPTY.with(colors::DIM),
        "no album selected, run `album <title>` first"
            .with(colors::DIM)
            .attribute(Attribute::Italic)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Prompt Styling
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_prompt() -> String {
    format!(
        "{}{} ",
        "zene".with(colors::AMBER).bold(),
        "❯".with(colors::VIOLET).bold(),
    )
}

pub fn print_command_echo(command: &str) {
    println!(
        "{}  {}",
        "❯".with(colors::VIOLET).bold(),
        command.with(colors::GREEN).bold()
    );
}

pub fn confirm_prompt(question: &str) -> String {
    format!(
        " {} {} {} ",
        "?".with(colors::AMBER).bold(),
        question.with(colors::WHITE),
        "[y/N]".with(colors::DIM)
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Welcome Message
// ═══════════════════════════════════════════════════════════════════════════════

fn print_box_row(content: &str, visible_len: usize, box_width: usize) {
    print!("  {}", box_chars::DOUBLE_VERTICAL.with(colors::VIOLET));
    print!("{}", content);
    print!("{}", " ".repeat(box_width.saturating_sub(visible_len)));
    println!("{}", box_chars::DOUBLE_VERTICAL.with(colors::VIOLET));
}

pub fn print_welcome(db_path: &str, id_strategy: &str) {
    print_banner();

    let box_width = 64;

    print!("  {}", box_chars::DOUBLE_TOP_LEFT.with(colors::VIOLET));
    print!(
        "{}",
        box_chars::DOUBLE_HORIZONTAL
            .repeat(box_width)
            .with(colors::VIOLET)
    );
    println!("{}", box_chars::DOUBLE_TOP_RIGHT.with(colors::VIOLET));

    let connected = "Connected to catalog database";
    print_box_row(
        &format!("  {}", connected.with(colors::GREEN)),
        connected.width() + 2,
        box_width,
    );
    print_box_row("", 0, box_width);

    let lines = [
        ("Database", db_path),
        ("Ids", id_strategy),
        ("Version", env!("CARGO_PKG_VERSION")),
    ];
    for (key, value) in lines {
        let content = format!("  {} {}", format!("{}:", key).with(colors::DIM), value);
        print_box_row(&content, key.width() + 2 + value.width() + 2, box_width);
    }
    print_box_row("", 0, box_width);

    let help_msg = "  Type 'help' for available commands";
    print_box_row(
        &help_msg.with(colors::DIM).to_string(),
        help_msg.width(),
        box_width,
    );

    print!("  {}", box_chars::DOUBLE_BOTTOM_LEFT.with(colors::VIOLET));
    print!(
        "{}",
        box_chars::DOUBLE_HORIZONTAL
            .repeat(box_width)
            .with(colors::VIOLET)
    );
    println!("{}", box_chars::DOUBLE_BOTTOM_RIGHT.with(colors::VIOLET));
    println!();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Help Display
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Reports,
    Inserts,
    Updates,
    Deletes,
    System,
}

impl CommandGroup {
    const ALL: [CommandGroup; 5] = [
        CommandGroup::Reports,
        CommandGroup::Inserts,
        CommandGroup::Updates,
        CommandGroup::Deletes,
        CommandGroup::System,
    ];

    fn title(self) -> &'static str {
        match self {
            CommandGroup::Reports => "Reports",
            CommandGroup::Inserts => "Inserts",
            CommandGroup::Updates => "Updates",
            CommandGroup::Deletes => "Deletes",
            CommandGroup::System => "System",
        }
    }

    fn color(self) -> CtColor {
        match self {
            CommandGroup::Reports => colors::TEAL,
            CommandGroup::Inserts => colors::GREEN,
            CommandGroup::Updates => colors::VIOLET,
            CommandGroup::Deletes => colors::RED,
            CommandGroup::System => colors::ORANGE,
        }
    }
}

pub struct CommandHelp {
    pub name: &'static str,
    pub args: &'static str,
    pub description: &'static str,
    pub group: CommandGroup,
}

pub fn print_help(commands: &[CommandHelp]) {
    println!();
    print_section_header("Available Commands");
    println!();

    for group in CommandGroup::ALL {
        let color = group.color();
        println!(
            "  {} {}",
            box_chars::DIAMOND.with(color),
            group.title().with(color).bold()
        );
        for cmd in commands.iter().filter(|c| c.group == group) {
            println!(
                "      {} {}  {}",
                cmd.name.with(colors::GREEN).bold(),
                cmd.args.with(colors::DIM),
                cmd.description.with(colors::WHITE)
            );
        }
        println!();
    }

    print_section_footer();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Goodbye Message
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_goodbye() {
    println!();
    println!(
        "  {}",
        "Goodbye! Catalog changes are already saved."
            .with(colors::VIOLET)
            .bold()
    );
    println!();
}

pub fn flush() {
    let _ = io::stdout().flush();
}
