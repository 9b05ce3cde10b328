use super::{Block, BlockKind};

/// Parse flat text into a block tree in one left-to-right scan.
///
/// Line-boundary rules (heading, list, quote, fence, rule) end a run of plain
/// lines; any contiguous non-boundary run becomes one paragraph. Nesting is
/// not reconstructed: this direction is lossy outside the supported subset.
pub fn parse(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks: Vec<Block> = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let raw = lines[i];
        let line = raw.trim_start();

        if let Some(language) = line.strip_prefix("```") {
            flush_paragraph(&mut paragraph, &mut blocks);
            let language = language.trim().to_string();
            let mut body: Vec<&str> = Vec::new();
            i += 1;
            while i < lines.len() && !lines[i].trim_start().starts_with("```") {
                body.push(lines[i]);
                i += 1;
            }
            // Skip the closing fence; an unterminated fence consumes to EOF.
            if i < lines.len() {
                i += 1;
            }
            blocks.push(Block::new(BlockKind::Code { language }, body.join("\n")));
            continue;
        }

        if is_rule(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::new(BlockKind::Divider, ""));
            i += 1;
            continue;
        }

        if let Some(block) = heading(line).or_else(|| list_item(line)) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(block);
            i += 1;
            continue;
        }

        if line.starts_with('>') {
            flush_paragraph(&mut paragraph, &mut blocks);
            let mut quoted: Vec<&str> = Vec::new();
            while i < lines.len() {
                let l = lines[i].trim_start();
                let Some(rest) = l.strip_prefix('>') else {
                    break;
                };
                quoted.push(rest.strip_prefix(' ').unwrap_or(rest));
                i += 1;
            }
            blocks.push(Block::new(BlockKind::Quote, quoted.join("\n")));
            continue;
        }

        if line.is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
        } else {
            paragraph.push(line);
        }
        i += 1;
    }

    flush_paragraph(&mut paragraph, &mut blocks);
    blocks
}

fn flush_paragraph(paragraph: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if !paragraph.is_empty() {
        blocks.push(Block::new(BlockKind::Paragraph, paragraph.join("\n")));
        paragraph.clear();
    }
}

fn heading(line: &str) -> Option<Block> {
    let (kind, rest) = if let Some(r) = line.strip_prefix("### ") {
        (BlockKind::Heading3, r)
    } else if let Some(r) = line.strip_prefix("## ") {
        (BlockKind::Heading2, r)
    } else if let Some(r) = line.strip_prefix("# ") {
        (BlockKind::Heading1, r)
    } else {
        return None;
    };
    Some(Block::new(kind, rest.trim_end()))
}

fn list_item(line: &str) -> Option<Block> {
    for (prefix, checked) in [("- [ ] ", false), ("- [x] ", true), ("- [X] ", true)] {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Some(Block::new(BlockKind::Todo { checked }, rest.trim_end()));
        }
    }
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Some(Block::new(BlockKind::Bulleted, rest.trim_end()));
    }
    numbered_item(line)
}

fn numbered_item(line: &str) -> Option<Block> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix(". ")?;
    Some(Block::new(BlockKind::Numbered, rest.trim_end()))
}

fn is_rule(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

#[cfg(test)]
#[path = "../tests/markdown/parse_tests.rs"]
mod tests;
