//! Indentation inspection.
//!
//! Replacement and inserted text is re-indented with a uniform prefix taken
//! from its surroundings. There is no relative re-indentation: every line of
//! the new text receives the same prefix.

/// Leading whitespace of `line`; empty for a missing or empty line.
pub fn indentation_of(line: Option<&str>) -> &str {
    match line {
        Some(line) => &line[..line.len() - line.trim_start().len()],
        None => "",
    }
}

/// Split `content` on `\n` and prefix every piece with `indent`.
pub fn apply_indentation(content: &str, indent: &str) -> Vec<String> {
    content
        .split('\n')
        .map(|line| format!("{indent}{line}"))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndentKind {
    Space,
    Tab,
}

impl IndentKind {
    fn byte(self) -> u8 {
        match self {
            IndentKind::Space => b' ',
            IndentKind::Tab => b'\t',
        }
    }

    fn unit(self, width: usize) -> String {
        char::from(self.byte()).to_string().repeat(width)
    }
}

#[derive(Debug)]
struct IndentUsage {
    kind: IndentKind,
    width: usize,
    count: usize,
    weight: usize,
}

/// Detect the dominant indentation unit of a file.
///
/// Each indented line is compared with the previous non-empty line; the
/// absolute change in indentation width is the candidate unit. The unit seen
/// most often wins, ties broken by how many lines kept the same indentation
/// right after it, then by first appearance. Returns an empty string for
/// unindented content.
pub fn detect_indent(content: &str) -> String {
    let mut usages: Vec<IndentUsage> = Vec::new();
    let mut previous_width = 0usize;
    let mut previous_kind: Option<IndentKind> = None;
    let mut current: Option<(IndentKind, usize)> = None;

    for line in content.lines() {
        if line.is_empty() {
            continue;
        }

        let kind = match line.as_bytes()[0] {
            b' ' => IndentKind::Space,
            b'\t' => IndentKind::Tab,
            _ => {
                previous_width = 0;
                previous_kind = None;
                continue;
            }
        };
        let width = line.bytes().take_while(|b| *b == kind.byte()).count();

        if previous_kind != Some(kind) {
            previous_width = 0;
        }
        previous_kind = Some(kind);

        let difference = width.abs_diff(previous_width);
        previous_width = width;

        let weight = if difference == 0 {
            1
        } else {
            current = Some((kind, difference));
            0
        };

        let Some((kind, width)) = current else {
            continue;
        };
        match usages
            .iter_mut()
            .find(|usage| usage.kind == kind && usage.width == width)
        {
            Some(usage) => {
                usage.count += 1;
                usage.weight += weight;
            }
            None => usages.push(IndentUsage {
                kind,
                width,
                count: 1,
                weight,
            }),
        }
    }

    let mut best: Option<&IndentUsage> = None;
    for usage in &usages {
        let better = match best {
            None => true,
            Some(best) => (usage.count, usage.weight) > (best.count, best.weight),
        };
        if better {
            best = Some(usage);
        }
    }

    best.map(|usage| usage.kind.unit(usage.width))
        .unwrap_or_default()
}
