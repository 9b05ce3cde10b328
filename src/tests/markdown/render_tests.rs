use super::*;

fn block(kind: BlockKind, text: &str) -> Block {
    Block::new(kind, text)
}

#[test]
fn renders_headings_and_paragraphs_with_blank_separators() {
    let text = render(&[
        block(BlockKind::Heading1, "Title"),
        block(BlockKind::Paragraph, "hello"),
        block(BlockKind::Heading3, "Sub"),
    ]);
    assert_eq!(text, "# Title\n\nhello\n\n### Sub");
}

#[test]
fn renders_list_kinds() {
    let text = render(&[
        block(BlockKind::Bulleted, "one"),
        block(BlockKind::Todo { checked: false }, "open"),
        block(BlockKind::Todo { checked: true }, "done"),
    ]);
    assert_eq!(text, "- one\n\n- [ ] open\n\n- [x] done");
}

#[test]
fn numbered_items_get_run_ordinals() {
    let text = render(&[
        block(BlockKind::Numbered, "first"),
        block(BlockKind::Numbered, "second"),
        block(BlockKind::Paragraph, "break"),
        block(BlockKind::Numbered, "restart"),
    ]);
    assert_eq!(text, "1. first\n\n2. second\n\nbreak\n\n1. restart");
}

#[test]
fn nested_children_indent_two_spaces_per_depth() {
    let parent = block(BlockKind::Bulleted, "outer").with_children(vec![
        block(BlockKind::Bulleted, "inner").with_children(vec![block(
            BlockKind::Bulleted,
            "innermost",
        )]),
    ]);
    assert_eq!(render(&[parent]), "- outer\n  - inner\n    - innermost");
}

#[test]
fn quote_children_stay_inside_the_quote() {
    let quote = block(BlockKind::Quote, "first line\nsecond line")
        .with_children(vec![block(BlockKind::Bulleted, "nested")]);
    assert_eq!(render(&[quote]), "> first line\n> second line\n> - nested");
}

#[test]
fn code_fences_carry_the_language_tag() {
    let code = block(
        BlockKind::Code {
            language: "rust".to_string(),
        },
        "fn main() {}\n",
    );
    assert_eq!(render(&[code]), "```rust\nfn main() {}\n```");
}

#[test]
fn divider_and_child_page_markers() {
    let text = render(&[
        block(BlockKind::Divider, ""),
        block(BlockKind::ChildPage, "Nested Page"),
    ]);
    assert_eq!(text, "---\n\n[[Nested Page]]");
}

#[test]
fn unsupported_blocks_leave_a_marker_instead_of_vanishing() {
    let mut unknown = block(
        BlockKind::Unsupported {
            kind: "embed".to_string(),
        },
        "",
    );
    unknown.id = Some("blk-77".to_string());
    assert_eq!(render(&[unknown]), "<!-- unsupported: embed blk-77 -->");
}

#[test]
fn trailing_whitespace_is_trimmed() {
    let text = render(&[block(BlockKind::Paragraph, "tail   ")]);
    assert_eq!(text, "tail");
}
