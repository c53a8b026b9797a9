//! Renders the composing buffer the host displays, and splits a walked
//! node sequence into text regions at arbitrary reading-space boundaries
//! (used both for the plain cursor splice and for Marking's head/marked/tail).
//!
//! Chinese words in this lattice cover exactly one Han character per
//! reading they span, so a boundary that falls strictly inside a node can
//! still be rendered by splitting that node's value at the matching
//! character index.

use bopomofo_core::grid::WalkedNode;

/// Splits `walk_nodes`' rendered text into `boundaries.len() + 1` regions
/// at the given reading-space positions (which need not be ascending
/// relative to node starts; `boundaries` itself must be sorted ascending).
fn split_into_regions(walk_nodes: &[WalkedNode], boundaries: &[usize]) -> Vec<String> {
    let mut regions = vec![String::new(); boundaries.len() + 1];
    let mut char_pos = 0usize;
    for node in walk_nodes {
        for ch in node.value.chars() {
            let region = boundaries.iter().position(|&b| char_pos < b).unwrap_or(boundaries.len());
            regions[region].push(ch);
            char_pos += 1;
        }
    }
    regions
}

/// Builds `(composing_text, cursor_utf8)` from a walk and the cursor's
/// position in reading-space. `buffer_text` is the reading buffer's
/// partial syllable, spliced in at the cursor, or empty if nothing is
/// composing.
pub fn render(walk_nodes: &[WalkedNode], cursor: usize, buffer_text: &str) -> (String, usize) {
    let regions = split_into_regions(walk_nodes, &[cursor]);
    let cursor_utf8 = regions[0].len() + buffer_text.len();
    let mut composing = regions[0].clone();
    composing.push_str(buffer_text);
    composing.push_str(&regions[1]);
    (composing, cursor_utf8)
}

/// Splits a walk into `(head, marked, tail)` around `[start, end)`, for
/// rendering a Marking state's three composing-buffer segments.
pub fn split_marking(walk_nodes: &[WalkedNode], start: usize, end: usize) -> (String, String, String) {
    let mut regions = split_into_regions(walk_nodes, &[start, end]);
    let tail = regions.pop().unwrap();
    let marked = regions.pop().unwrap();
    let head = regions.pop().unwrap();
    (head, marked, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(value: &str, span_length: usize) -> WalkedNode {
        WalkedNode {
            reading: "x".to_string(),
            span_length,
            value: value.to_string(),
            score: 0.0,
        }
    }

    #[test]
    fn splices_buffer_text_at_a_node_boundary() {
        let nodes = vec![node("高科技", 3), node("公司", 2)];
        let (text, cursor) = render(&nodes, 3, "ㄉㄜ˙");
        assert_eq!(text, "高科技ㄉㄜ˙公司");
        assert_eq!(cursor, "高科技".len() + "ㄉㄜ˙".len());
    }

    #[test]
    fn empty_buffer_places_cursor_between_nodes() {
        let nodes = vec![node("高科技", 3), node("公司", 2)];
        let (text, cursor) = render(&nodes, 3, "");
        assert_eq!(text, "高科技公司");
        assert_eq!(cursor, "高科技".len());
    }

    #[test]
    fn cursor_splitting_a_multi_reading_node_splits_its_characters() {
        // "年中" is one node spanning 2 readings; cursor at position 1
        // (between the two readings) must split the word, not the node.
        let nodes = vec![node("年中", 2)];
        let (text, cursor) = render(&nodes, 1, "");
        assert_eq!(text, "年中");
        assert_eq!(cursor, "年".len());
    }

    #[test]
    fn marking_splits_into_three_regions() {
        let nodes = vec![node("高科技", 3), node("公司", 2), node("的", 1)];
        let (head, marked, tail) = split_marking(&nodes, 3, 5);
        assert_eq!(head, "高科技");
        assert_eq!(marked, "公司");
        assert_eq!(tail, "的");
    }

    #[test]
    fn marking_can_split_mid_word_on_either_edge() {
        let nodes = vec![node("年中", 2), node("獎金", 2)];
        let (head, marked, tail) = split_marking(&nodes, 1, 3);
        assert_eq!(head, "年");
        assert_eq!(marked, "中獎");
        assert_eq!(tail, "金");
    }
}
