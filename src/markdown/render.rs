use super::{Block, BlockKind};

/// Render a block tree to flat text. Sections are joined by one blank line;
/// nested children indent two spaces per depth; trailing whitespace is
/// trimmed.
pub fn render(blocks: &[Block]) -> String {
    let mut sections: Vec<String> = Vec::new();
    let mut ordinal = 0usize;
    for block in blocks {
        ordinal = next_ordinal(block, ordinal);
        let mut lines = Vec::new();
        render_block(block, 0, ordinal, &mut lines);
        sections.push(
            lines
                .iter()
                .map(|l| l.trim_end())
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }
    sections.join("\n\n").trim_end().to_string()
}

fn next_ordinal(block: &Block, previous: usize) -> usize {
    if matches!(block.kind, BlockKind::Numbered) {
        previous + 1
    } else {
        0
    }
}

fn render_block(block: &Block, depth: usize, ordinal: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    match &block.kind {
        BlockKind::Heading1 => out.push(format!("{indent}# {}", block.text)),
        BlockKind::Heading2 => out.push(format!("{indent}## {}", block.text)),
        BlockKind::Heading3 => out.push(format!("{indent}### {}", block.text)),
        BlockKind::Paragraph => {
            if block.text.is_empty() {
                out.push(indent.clone());
            }
            for line in block.text.lines() {
                out.push(format!("{indent}{line}"));
            }
        }
        BlockKind::Bulleted => out.push(format!("{indent}- {}", block.text)),
        BlockKind::Numbered => out.push(format!("{indent}{}. {}", ordinal.max(1), block.text)),
        BlockKind::Todo { checked } => {
            let mark = if *checked { "x" } else { " " };
            out.push(format!("{indent}- [{mark}] {}", block.text));
        }
        BlockKind::Quote => {
            for line in block.text.lines() {
                out.push(format!("{indent}> {line}"));
            }
            if block.text.is_empty() {
                out.push(format!("{indent}>"));
            }
            // Nested children render normally, then every produced line is
            // re-prefixed so the whole subtree stays inside the quote.
            let mut inner = Vec::new();
            render_children(block, 0, &mut inner);
            for line in inner {
                out.push(format!("{indent}> {line}"));
            }
            return;
        }
        BlockKind::Code { language } => {
            out.push(format!("{indent}```{language}"));
            for line in block.text.lines() {
                out.push(format!("{indent}{line}"));
            }
            out.push(format!("{indent}```"));
            return;
        }
        BlockKind::Divider => out.push(format!("{indent}---")),
        BlockKind::ChildPage => out.push(format!("{indent}[[{}]]", block.text)),
        BlockKind::Unsupported { kind } => {
            // Never drop a block silently: leave a marker naming what it was.
            let id = block.id.as_deref().unwrap_or("unknown");
            out.push(format!("{indent}<!-- unsupported: {kind} {id} -->"));
        }
    }
    render_children(block, depth + 1, out);
}

fn render_children(block: &Block, depth: usize, out: &mut Vec<String>) {
    let mut ordinal = 0usize;
    for child in &block.children {
        ordinal = next_ordinal(child, ordinal);
        render_block(child, depth, ordinal, out);
    }
}

#[cfg(test)]
#[path = "../tests/markdown/render_tests.rs"]
mod tests;
