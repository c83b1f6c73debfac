//! Status lines printed around the diagnostics.
//! 诊断信息之外的状态输出。
//!
//! Colors are used only when the stream is a terminal and `NO_COLOR` is unset.
//! 仅当输出为终端且未设置 `NO_COLOR` 时使用颜色。

use std::io::IsTerminal;

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn colored(self) -> bool {
        if std::env::var_os("NO_COLOR").is_some() {
            return false;
        }
        match self {
            Stream::Stdout => std::io::stdout().is_terminal(),
            Stream::Stderr => std::io::stderr().is_terminal(),
        }
    }
}

fn paint(stream: Stream, color: &str, text: &str) -> String {
    if stream.colored() {
        format!("\x1b[{color}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

/// Print a success message in green.
/// 以绿色打印成功消息。
pub fn success(msg: &str) {
    println!("{}", paint(Stream::Stdout, "32", msg));
}

/// Print a warning message in yellow.
/// 以黄色打印警告消息。
pub fn warning(msg: &str) {
    eprintln!("{} {msg}", paint(Stream::Stderr, "33", "warning:"));
}

/// Print an error message in red.
/// 以红色打印错误消息。
pub fn error(msg: &str) {
    eprintln!("{} {msg}", paint(Stream::Stderr, "31", "error:"));
}

/// Print an info message in blue.
pub fn info(msg: &str) {
    println!("{} {msg}", paint(Stream::Stdout, "34", "info:"));
}

/// `path: 2 errors, 1 warning`.
pub fn summary(path: &str, errors: usize, warnings: usize) -> String {
    format!(
        "{path}: {} {}, {} {}",
        errors,
        plural(errors, "error"),
        warnings,
        plural(warnings, "warning")
    )
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_pluralizes() {
        assert_eq!(summary("a.loom", 1, 2), "a.loom: 1 error, 2 warnings");
        assert_eq!(summary("a.loom", 0, 1), "a.loom: 0 errors, 1 warning");
    }
}
