//! Canonical text output for config trees.
//!
//! Sections and items are written in name order, each preceded by its
//! comment block. Multi-line definitions keep their line breaks with
//! continuation lines aligned just past the opening bracket. Sections that
//! contain a multi-line item get a blank line after every item.

use crate::error::Result;
use crate::parser::parse;
use crate::tree::{ConfigTree, Item};
use crate::value::Value;

/// Widest `name = value` line produced when laying out a new value.
pub const MAX_LINE_WIDTH: usize = 79;

/// Render a tree as canonical text.
///
/// # Example
/// ```
/// use gait_config::{dump, parse};
///
/// let tree = parse("[sec]\nb = 2\na = 1\n").unwrap();
/// assert_eq!(dump(&tree), "[sec]\na = 1\nb = 2\n");
/// ```
pub fn dump(tree: &ConfigTree) -> String {
    let mut out: Vec<String> = Vec::new();

    for (name, section) in tree.sections() {
        push_separator(&mut out);
        push_comment(&mut out, section.comment_lines());
        out.push(format!("[{name}]"));

        let spaced = section.has_multiline_items();
        for (_, item) in section.items() {
            push_comment(&mut out, item.comment_lines());
            out.extend(definition_lines(item));
            if spaced {
                out.push(String::new());
            }
        }
    }

    if !tree.trailing_comment().is_empty() {
        push_separator(&mut out);
        push_comment(&mut out, tree.trailing_comment());
    }

    while out.last().is_some_and(String::is_empty) {
        out.pop();
    }
    if out.is_empty() {
        return String::new();
    }
    let mut text = out.join("\n");
    text.push('\n');
    text
}

/// Parse and re-dump config text, sorting and re-indenting it.
pub fn canonicalize(text: &str) -> Result<String> {
    Ok(dump(&parse(text)?))
}

/// One blank line between blocks, never two.
fn push_separator(out: &mut Vec<String>) {
    if out.last().is_some_and(|line| !line.is_empty()) {
        out.push(String::new());
    }
}

fn push_comment(out: &mut Vec<String>, comment: &[String]) {
    for line in comment {
        if line.is_empty() {
            out.push("#".to_string());
        } else {
            out.push(format!("# {line}"));
        }
    }
}

/// The physical lines of an item definition, continuation lines indented.
pub(crate) fn definition_lines(item: &Item) -> Vec<String> {
    let Some((first, rest)) = item.lines().split_first() else {
        return vec![format!("{} =", item.name())];
    };
    let mut out = Vec::with_capacity(rest.len() + 1);
    if first.is_empty() {
        out.push(format!("{} =", item.name()));
    } else {
        out.push(format!("{} = {first}", item.name()));
    }
    let indent = " ".repeat(continuation_indent(item.name(), first));
    out.extend(rest.iter().map(|line| format!("{indent}{line}")));
    out
}

fn continuation_indent(name: &str, first: &str) -> usize {
    let value_column = name.len() + " = ".len();
    if first.starts_with(['[', '(', '{']) {
        value_column + 1
    } else {
        value_column
    }
}

/// Definition lines for a freshly assigned value.
///
/// Values that fit on one line stay there. Longer containers are broken
/// after each top-level element.
pub(crate) fn layout_value(name: &str, value: &Value) -> Vec<String> {
    let single = value.to_literal();
    if name.len() + " = ".len() + single.len() <= MAX_LINE_WIDTH {
        return vec![single];
    }
    let (open, close, parts): (char, char, Vec<String>) = match value {
        Value::List(items) if items.len() > 1 => {
            ('[', ']', items.iter().map(Value::to_literal).collect())
        }
        Value::Tuple(items) if items.len() > 1 => {
            ('(', ')', items.iter().map(Value::to_literal).collect())
        }
        Value::Dict(entries) if entries.len() > 1 => (
            '{',
            '}',
            entries
                .iter()
                .map(|(k, v)| format!("{}: {}", k.to_literal(), v.to_literal()))
                .collect(),
        ),
        _ => return vec![single],
    };

    let last = parts.len() - 1;
    parts
        .into_iter()
        .enumerate()
        .map(|(idx, part)| {
            let mut line = String::with_capacity(part.len() + 2);
            if idx == 0 {
                line.push(open);
            }
            line.push_str(&part);
            line.push(if idx == last { close } else { ',' });
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_short_values_stay_on_one_line() {
        assert_eq!(layout_value("x", &Value::from(vec![1, 2, 3])), ["[1, 2, 3]"]);
    }

    #[test]
    fn test_long_dict_is_broken_per_entry() {
        let value = Value::Dict(vec![
            (Value::from("RHam"), Value::from("Medial hamstrings (R)")),
            (Value::from("RRec"), Value::from("Rectus femoris (R)")),
            (Value::from("RGas"), Value::from("Gastrocnemius (R)")),
        ]);
        assert_eq!(
            layout_value("emg_labels", &value),
            [
                "{'RHam': 'Medial hamstrings (R)',",
                "'RRec': 'Rectus femoris (R)',",
                "'RGas': 'Gastrocnemius (R)'}",
            ]
        );
    }

    #[test]
    fn test_long_scalar_is_never_split() {
        let long = "x".repeat(100);
        assert_eq!(layout_value("s", &Value::from(long.as_str())).len(), 1);
    }

    #[test]
    fn test_continuation_alignment() {
        let item = Item::new(
            "emg_labels",
            Value::Dict(vec![
                (Value::from("RHam"), Value::from("Medial hamstrings (R)")),
                (Value::from("RRec"), Value::from("Rectus femoris (R)")),
                (Value::from("RGas"), Value::from("Gastrocnemius (R)")),
            ]),
        )
        .unwrap();
        assert_eq!(
            definition_lines(&item),
            [
                "emg_labels = {'RHam': 'Medial hamstrings (R)',",
                "              'RRec': 'Rectus femoris (R)',",
                "              'RGas': 'Gastrocnemius (R)'}",
            ]
        );
    }

    #[test]
    fn test_no_double_blank_lines_between_spaced_sections() {
        let tree = parse("[a]\nx = [1,\n 2]\n[b]\ny = 1\n").unwrap();
        assert_eq!(dump(&tree), "[a]\nx = [1,\n     2]\n\n[b]\ny = 1\n");
    }

    #[test]
    fn test_empty_tree_dumps_to_empty_string() {
        assert_eq!(dump(&ConfigTree::new()), "");
    }
}
