//! Edits to the root UI component (`App.tsx`): provider wrapping and imports

use regex::Regex;
use std::sync::LazyLock;

static IMPORT_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^import\b[^;]*;").expect("valid regex"));
static APP_COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:export\s+default\s+)?(?:function\s+App\b|const\s+App\b)")
        .expect("valid regex")
});

const INDENT: &str = "  ";

/// Byte range of the JSX inside `return ( ... )` of the `App` component.
///
/// The closing paren is the first line starting with `)` at the indentation
/// of the `return` line, which is how formatted components are laid out.
fn returned_jsx(content: &str) -> Option<(usize, usize)> {
    let app = APP_COMPONENT.find(content)?;
    let return_at = app.end() + content[app.end()..].find("return (")?;
    let open = return_at + "return (".len();

    let line_start = content[..return_at].rfind('\n').map_or(0, |i| i + 1);
    let indent = leading_indent(&content[line_start..return_at]);

    let mut offset = open;
    for line in content[open..].split_inclusive('\n') {
        let body = line.trim_start();
        if body.starts_with(')') && leading_indent(line) == indent && offset > open {
            return Some((open, offset + indent.len()));
        }
        offset += line.len();
    }
    None
}

fn leading_indent(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Split `return ( ... )` contents into JSX lines, their indent and trailing whitespace
fn split_body(inner: &str) -> (Vec<&str>, String, &str) {
    let trimmed = inner.trim_end();
    let trailing = &inner[trimmed.len()..];
    let lines: Vec<&str> = trimmed.lines().filter(|l| !l.trim().is_empty()).collect();
    let indent = lines
        .first()
        .map(|l| leading_indent(l).to_string())
        .unwrap_or_else(|| INDENT.repeat(2));
    (lines, indent, trailing)
}

/// Add an import statement after the last existing import
pub fn add_import(content: &str, import_line: &str) -> String {
    if content.contains(import_line) {
        return content.to_string();
    }
    match IMPORT_STATEMENT.find_iter(content).last() {
        Some(last) => format!(
            "{}\n{}{}",
            &content[..last.end()],
            import_line,
            &content[last.end()..]
        ),
        None => format!("{}\n{}", import_line, content),
    }
}

/// Wrap the returned JSX of `App` in `<provider>` and import it.
///
/// A component that already renders the provider is returned unchanged.
pub fn wrap_root(content: &str, provider: &str, import_line: &str) -> String {
    if content.contains(&format!("<{}", provider)) {
        return content.to_string();
    }
    let Some((open, close)) = returned_jsx(content) else {
        return content.to_string();
    };
    let (lines, indent, trailing) = split_body(&content[open..close]);

    let mut body = format!("\n{}<{}>", indent, provider);
    for line in lines {
        body.push('\n');
        body.push_str(INDENT);
        body.push_str(line);
    }
    body.push_str(&format!("\n{}</{}>{}", indent, provider, trailing));

    let wrapped = format!("{}{}{}", &content[..open], body, &content[close..]);
    add_import(&wrapped, import_line)
}

/// Replace the returned JSX of `App` with `jsx` (one element per line, unindented)
pub fn replace_root(content: &str, jsx: &[&str], marker: &str) -> String {
    if content.contains(marker) {
        return content.to_string();
    }
    let Some((open, close)) = returned_jsx(content) else {
        return content.to_string();
    };
    let (_, indent, trailing) = split_body(&content[open..close]);

    let mut body = String::new();
    for line in jsx {
        body.push('\n');
        body.push_str(&indent);
        body.push_str(line);
    }
    body.push_str(trailing);
    format!("{}{}{}", &content[..open], body, &content[close..])
}
