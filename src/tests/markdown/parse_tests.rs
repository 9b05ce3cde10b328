use super::*;
use crate::markdown::render;

#[test]
fn heading_bullet_paragraph_in_order() {
    let blocks = parse("# Title\n\n- item\n\nhello");
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].kind, BlockKind::Heading1);
    assert_eq!(blocks[0].text, "Title");
    assert_eq!(blocks[1].kind, BlockKind::Bulleted);
    assert_eq!(blocks[1].text, "item");
    assert_eq!(blocks[2].kind, BlockKind::Paragraph);
    assert_eq!(blocks[2].text, "hello");
}

#[test]
fn contiguous_plain_lines_join_into_one_paragraph() {
    let blocks = parse("first line\nsecond line\n\nanother");
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].text, "first line\nsecond line");
    assert_eq!(blocks[1].text, "another");
}

#[test]
fn heading_levels_one_to_three() {
    let blocks = parse("# a\n## b\n### c\n#### d");
    assert_eq!(blocks[0].kind, BlockKind::Heading1);
    assert_eq!(blocks[1].kind, BlockKind::Heading2);
    assert_eq!(blocks[2].kind, BlockKind::Heading3);
    // No level four: the run becomes a paragraph.
    assert_eq!(blocks[3].kind, BlockKind::Paragraph);
    assert_eq!(blocks[3].text, "#### d");
}

#[test]
fn checklist_and_numbered_prefixes() {
    let blocks = parse("- [ ] open\n- [x] done\n3. third");
    assert_eq!(blocks[0].kind, BlockKind::Todo { checked: false });
    assert_eq!(blocks[1].kind, BlockKind::Todo { checked: true });
    assert_eq!(blocks[2].kind, BlockKind::Numbered);
    assert_eq!(blocks[2].text, "third");
}

#[test]
fn consecutive_quote_lines_merge_into_one_block() {
    let blocks = parse("> first\n> second\n>\n> fourth\nplain");
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].kind, BlockKind::Quote);
    assert_eq!(blocks[0].text, "first\nsecond\n\nfourth");
    assert_eq!(blocks[1].kind, BlockKind::Paragraph);
}

#[test]
fn fenced_code_consumes_greedily_until_close() {
    let blocks = parse("```rust\nlet x = 1;\n\n# not a heading\n```\nafter");
    assert_eq!(blocks.len(), 2);
    assert_eq!(
        blocks[0].kind,
        BlockKind::Code {
            language: "rust".to_string()
        }
    );
    assert_eq!(blocks[0].text, "let x = 1;\n\n# not a heading");
    assert_eq!(blocks[1].text, "after");
}

#[test]
fn unterminated_fence_runs_to_end_of_input() {
    let blocks = parse("```\ncode body");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].text, "code body");
}

#[test]
fn horizontal_rule_is_a_divider() {
    let blocks = parse("above\n\n---\n\nbelow");
    assert_eq!(blocks[1].kind, BlockKind::Divider);
}

#[test]
fn unsupported_marker_reparses_as_plain_paragraph() {
    // Documented lossy edge: the marker is not restored to its block kind.
    let blocks = parse("<!-- unsupported: embed blk-77 -->");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind, BlockKind::Paragraph);
}

#[test]
fn canonical_text_round_trips_for_the_supported_subset() {
    let text = "# Title\n\n- item\n\n- [x] done\n\n1. first\n\n2. second\n\n> quoted\n> lines\n\n```sh\nls\n```\n\n---\n\nclosing words";
    let once = parse(text);
    let rendered = render(&once);
    let twice = parse(&rendered);
    assert_eq!(once, twice);
    // And rendering is idempotent from there on.
    assert_eq!(rendered, render(&twice));
}
