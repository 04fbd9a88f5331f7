// styled log output, prefixed with the tool name

use console::style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// print a prefixed, colour-coded message
pub fn log(message: &str, level: Level) {
    let prefix = style("format-commit:").bold();
    let line = format!("{prefix} {message}");
    match level {
        Level::Info => println!("{line}"),
        Level::Success => println!("{}", style(line).green()),
        Level::Warning => println!("{}", style(line).yellow()),
        Level::Error => eprintln!("{}", style(line).red()),
    }
}

pub fn info(message: &str) {
    log(message, Level::Info);
}

pub fn success(message: &str) {
    log(message, Level::Success);
}

pub fn warn(message: &str) {
    log(message, Level::Warning);
}

pub fn error(message: &str) {
    log(message, Level::Error);
}
