//! Text edits on native iOS and Android build files

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static GRADLE_APPLY_PLUGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^apply plugin:\s*["'][^"']+["']\s*$"#).expect("valid regex"));

/// Language of an AppDelegate source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppDelegateKind {
    Swift,
    ObjC,
}

impl AppDelegateKind {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("swift") => AppDelegateKind::Swift,
            _ => AppDelegateKind::ObjC,
        }
    }

    fn import_prefix(&self) -> &'static str {
        match self {
            AppDelegateKind::Swift => "import ",
            AppDelegateKind::ObjC => "#import ",
        }
    }
}

fn line_indent(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Byte offset just past the line containing `at`
fn end_of_line(content: &str, at: usize) -> usize {
    content[at..]
        .find('\n')
        .map_or(content.len(), |i| at + i + 1)
}

/// Add an import line after the last existing import of the file's language
pub fn add_native_import(content: &str, kind: AppDelegateKind, import_line: &str) -> String {
    if content.lines().any(|l| l.trim() == import_line) {
        return content.to_string();
    }
    let prefix = kind.import_prefix();
    let mut offset = 0;
    let mut insert_at = None;
    for line in content.split_inclusive('\n') {
        offset += line.len();
        if line.starts_with(prefix) {
            insert_at = Some(offset);
        }
    }
    match insert_at {
        Some(at) => {
            let needs_newline = !content[..at].ends_with('\n');
            format!(
                "{}{}{}\n{}",
                &content[..at],
                if needs_newline { "\n" } else { "" },
                import_line,
                &content[at..]
            )
        }
        None => format!("{}\n{}", import_line, content),
    }
}

/// Insert a statement as the first line of `didFinishLaunchingWithOptions`
pub fn insert_launch_statement(content: &str, statement: &str) -> String {
    if content.contains(statement) {
        return content.to_string();
    }
    let Some(method) = content.find("didFinishLaunchingWithOptions") else {
        return content.to_string();
    };
    let Some(brace) = content[method..].find('{').map(|i| method + i) else {
        return content.to_string();
    };
    let insert_at = end_of_line(content, brace);
    let indent = content[insert_at..]
        .lines()
        .find(|l| !l.trim().is_empty())
        .map(line_indent)
        .unwrap_or("    ");
    format!(
        "{}{}{}\n{}",
        &content[..insert_at],
        indent,
        statement,
        &content[insert_at..]
    )
}

/// Remove every line matching `pattern`
pub fn remove_lines(content: &str, pattern: &Regex) -> String {
    content
        .split_inclusive('\n')
        .filter(|line| !pattern.is_match(line))
        .collect()
}

/// Insert `lines` after the first line containing `anchor`, unless the first is already present
pub fn insert_after_line(content: &str, anchor: &str, lines: &[&str]) -> String {
    let Some(first) = lines.first() else {
        return content.to_string();
    };
    if content.contains(first) {
        return content.to_string();
    }
    let Some(at) = content.find(anchor) else {
        return content.to_string();
    };
    let insert_at = end_of_line(content, at);
    let mut block = String::new();
    if !content[..insert_at].ends_with('\n') {
        block.push('\n');
    }
    for line in lines {
        block.push_str(line);
        block.push('\n');
    }
    format!("{}{}{}", &content[..insert_at], block, &content[insert_at..])
}

/// Add a `classpath` line to the `buildscript { dependencies { ... } }` block
pub fn add_gradle_classpath(content: &str, artifact: &str) -> String {
    if content.contains(artifact) {
        return content.to_string();
    }
    let Some(buildscript) = content.find("buildscript") else {
        return content.to_string();
    };
    let Some(deps) = content[buildscript..]
        .find("dependencies {")
        .map(|i| buildscript + i)
    else {
        return content.to_string();
    };
    let insert_at = end_of_line(content, deps);
    let indent = content[insert_at..]
        .lines()
        .find(|l| !l.trim().is_empty() && !l.trim_start().starts_with('}'))
        .map(line_indent)
        .unwrap_or("        ");
    format!(
        "{}{}classpath(\"{}\")\n{}",
        &content[..insert_at],
        indent,
        artifact,
        &content[insert_at..]
    )
}

/// Add `apply plugin: "<id>"` after the last existing one
pub fn apply_gradle_plugin(content: &str, plugin: &str) -> String {
    let line = format!("apply plugin: \"{}\"", plugin);
    if content.contains(&format!("\"{}\"", plugin)) || content.contains(&format!("'{}'", plugin))
    {
        return content.to_string();
    }
    match GRADLE_APPLY_PLUGIN.find_iter(content).last() {
        Some(last) => {
            let at = end_of_line(content, last.start());
            let newline = if content[..at].ends_with('\n') { "" } else { "\n" };
            format!("{}{}{}\n{}", &content[..at], newline, line, &content[at..])
        }
        None => format!("{}\n{}", line, content),
    }
}
