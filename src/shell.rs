//! Line-oriented command dispatcher: one instance per connected session.
//!
//! Parses a command line, resolves paths against the session's current
//! directory and invokes the path index / edit session. Output is returned
//! as printable lines; the transport that carries them is not our concern.

use std::sync::Arc;

use crate::error::FsError;
use crate::model::NodeKind;
use crate::session::EditSession;
use crate::vfs::{PathIndex, normalize};

pub enum Outcome {
    Lines(Vec<String>),
    Exit,
}

pub struct Shell {
    index: Arc<PathIndex>,
    session: EditSession,
    cwd: String,
}

impl Shell {
    pub fn new(index: Arc<PathIndex>) -> Self {
        Self {
            session: EditSession::new(index.clone()),
            index,
            cwd: "/".to_string(),
        }
    }

    pub fn prompt(&self) -> String {
        match self.session.target() {
            Some(path) => format!("edit:{path}> "),
            None => format!("{}> ", self.cwd),
        }
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// Dispatch one command line. Errors come back as `Err` and are rendered
    /// by the caller; `Outcome::Exit` ends the session.
    pub fn run_line(&mut self, line: &str) -> Result<Outcome, FsError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Outcome::Lines(Vec::new()));
        }
        if self.session.is_editing() {
            return self.run_edit_directive(line);
        }

        let (cmd, rest) = split_command(line);
        let args = tokenize(rest);
        match cmd {
            "ls" => self.ls(args.first().map(String::as_str)),
            "cd" => self.cd(args.first().map(String::as_str)),
            "pwd" => Ok(Outcome::Lines(vec![self.cwd.clone()])),
            "cat" => {
                let path = self.resolve(require_arg(&args, 0, "cat <path>")?);
                let content = self.index.read_file(&path)?;
                Ok(Outcome::Lines(content.lines().map(str::to_string).collect()))
            }
            "stat" => {
                let path = self.resolve(require_arg(&args, 0, "stat <path>")?);
                Ok(Outcome::Lines(self.stat_lines(&path)?))
            }
            "grep" => self.grep(&args),
            "mkdir" | "touch" => {
                let usage = if cmd == "mkdir" {
                    "mkdir <path>"
                } else {
                    "touch <path>"
                };
                let path = self.resolve(require_arg(&args, 0, usage)?);
                let created = self.index.create(&path)?;
                Ok(Outcome::Lines(vec![created]))
            }
            "refresh" => {
                let force = args.iter().any(|a| a == "-f" || a == "--force");
                self.index.refresh(force)?;
                Ok(Outcome::Lines(vec!["ok".to_string()]))
            }
            "status" => Ok(Outcome::Lines(vec![format!(
                "indexed: {}  refreshing: {}",
                self.index.is_indexed(),
                self.index.is_refreshing()
            )])),
            "edit" => {
                let path = self.resolve(require_arg(&args, 0, "edit <path>")?);
                self.session.open(&path)?;
                Ok(Outcome::Lines(vec![format!(
                    "editing {} ({} lines)",
                    self.session.target().unwrap_or(&path),
                    self.session.lines().map(<[String]>::len).unwrap_or(0)
                )]))
            }
            "help" => Ok(Outcome::Lines(help_lines())),
            "exit" | "quit" => Ok(Outcome::Exit),
            other => Err(FsError::Command(format!(
                "unknown command: {other} (try `help`)"
            ))),
        }
    }

    fn run_edit_directive(&mut self, line: &str) -> Result<Outcome, FsError> {
        let (cmd, rest) = split_command(line);
        match cmd {
            "p" | "print" => {
                let lines = self.session.lines()?;
                let width = lines.len().to_string().len().max(1);
                Ok(Outcome::Lines(
                    lines
                        .iter()
                        .enumerate()
                        .map(|(i, l)| format!("{:>width$}  {l}", i + 1))
                        .collect(),
                ))
            }
            "a" | "append" => {
                self.session.append_line(rest)?;
                Ok(Outcome::Lines(Vec::new()))
            }
            "r" | "replace" => {
                let (n, text) = split_command(rest);
                let n = parse_line_number(n)?;
                self.session.replace_line(n, text)?;
                Ok(Outcome::Lines(Vec::new()))
            }
            "d" | "delete" => {
                let n = parse_line_number(rest.trim())?;
                self.session.delete_line(n)?;
                Ok(Outcome::Lines(Vec::new()))
            }
            "clear" => {
                self.session.clear()?;
                Ok(Outcome::Lines(Vec::new()))
            }
            "cancel" => {
                self.session.cancel()?;
                Ok(Outcome::Lines(vec!["cancelled".to_string()]))
            }
            "commit" => {
                let path = self.session.commit()?;
                Ok(Outcome::Lines(vec![format!("wrote {path}")]))
            }
            other => Err(FsError::Command(format!(
                "unknown edit directive: {other} (p/a/r/d/clear/commit/cancel)"
            ))),
        }
    }

    fn resolve(&self, input: &str) -> String {
        normalize(&self.cwd, input)
    }

    fn ls(&self, arg: Option<&str>) -> Result<Outcome, FsError> {
        let path = self.resolve(arg.unwrap_or("."));
        let entries = self.index.list(&path)?;
        Ok(Outcome::Lines(
            entries
                .into_iter()
                .map(|e| {
                    let suffix = if e.kind == NodeKind::Directory { "/" } else { "" };
                    format!("{:<12} {}{suffix}", e.kind.label(), e.name)
                })
                .collect(),
        ))
    }

    fn cd(&mut self, arg: Option<&str>) -> Result<Outcome, FsError> {
        let path = self.resolve(arg.unwrap_or("/"));
        let tree = self.index.snapshot()?;
        let node = tree.require(&path)?;
        if node.kind != NodeKind::Directory {
            return Err(FsError::NotADirectory(path));
        }
        self.cwd = path;
        Ok(Outcome::Lines(Vec::new()))
    }

    fn stat_lines(&self, path: &str) -> Result<Vec<String>, FsError> {
        let stat = self.index.stat(path)?;
        let mut lines = vec![
            format!("path:   {}", stat.path),
            format!("kind:   {}", stat.kind.label()),
        ];
        if let Some(id) = &stat.id {
            lines.push(format!("record: {id}"));
        }
        if let Some(title) = &stat.title {
            lines.push(format!("title:  {title}"));
        }
        if let Some(created) = &stat.created_at {
            lines.push(format!("created: {created}"));
        }
        if let Some(edited) = &stat.last_edited_at {
            lines.push(format!("edited:  {edited}"));
        }
        if let Some(owner) = &stat.owner {
            lines.push(format!("owner:   {owner}"));
        }
        Ok(lines)
    }

    fn grep(&self, args: &[String]) -> Result<Outcome, FsError> {
        let mut recursive = false;
        let mut ignore_case = false;
        let mut rest: Vec<&str> = Vec::new();
        for arg in args {
            match arg.as_str() {
                "-r" | "--recursive" => recursive = true,
                "-i" | "--ignore-case" => ignore_case = true,
                other => rest.push(other),
            }
        }
        let pattern = rest
            .first()
            .ok_or_else(|| FsError::Command("usage: grep [-r] [-i] <pattern> [path]".into()))?;
        let path = self.resolve(rest.get(1).copied().unwrap_or("."));
        let matches = self.index.grep(pattern, &path, recursive, ignore_case)?;
        Ok(Outcome::Lines(
            matches
                .into_iter()
                .map(|m| format!("{}:{}: {}", m.path, m.line_number, m.line))
                .collect(),
        ))
    }
}

fn require_arg<'a>(args: &'a [String], i: usize, usage: &str) -> Result<&'a str, FsError> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| FsError::Command(format!("usage: {usage}")))
}

fn parse_line_number(s: &str) -> Result<usize, FsError> {
    s.parse()
        .map_err(|_| FsError::Command(format!("not a line number: {s}")))
}

/// First whitespace-delimited word and the raw remainder (edit directives
/// take their text verbatim, so the remainder must not be re-tokenized).
fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim_start()),
        None => (line, ""),
    }
}

/// Quote-aware argument splitting for non-edit commands.
fn tokenize(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;
    for c in input.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending || !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => current.push(c),
        }
    }
    if pending || !current.is_empty() {
        args.push(current);
    }
    args
}

fn help_lines() -> Vec<String> {
    [
        "ls [path]                list directory entries",
        "cd [path]                change directory",
        "pwd                      print working directory",
        "cat <path>               print file content",
        "stat <path>              show record metadata",
        "grep [-r] [-i] <pat> [path]  search file content",
        "mkdir <path>             create a page (directory + content file)",
        "touch <path>             create a page (same as mkdir)",
        "edit <path>              enter the line editor",
        "refresh [-f]             re-index the namespace",
        "status                   index / refresh state",
        "exit                     end the session",
        "",
        "in edit mode: p | a <text> | r <n> <text> | d <n> | clear | commit | cancel",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

#[cfg(test)]
#[path = "tests/shell/shell_tests.rs"]
mod tests;
