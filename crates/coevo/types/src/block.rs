//! Plain-text conventions shared by test generation and execution.
//!
//! A generated batch holds one test per block, blocks separated by a line made
//! only of [`BLOCK_SEPARATOR`]. Inside a block, the gold answer is the option
//! line ending in `::: (<label>) *`.

/// Line separating individual blocks in a generated batch.
pub const BLOCK_SEPARATOR: &str = "#####";

/// Extract the gold label from the first starred option line.
pub fn parse_gold_label(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let rest = line.trim_end().strip_suffix('*')?.trim_end();
        let (_, tail) = rest.rsplit_once(":::")?;
        let label = tail.trim().strip_prefix('(')?.strip_suffix(')')?.trim();
        if label.is_empty() {
            None
        } else {
            Some(label.to_string())
        }
    })
}

/// Split a generated batch into at most `limit` non-empty blocks.
pub fn split_blocks(raw: &str, limit: usize) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();

    for line in raw.lines() {
        if line.trim() == BLOCK_SEPARATOR {
            push_block(&mut blocks, &current);
            current.clear();
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    push_block(&mut blocks, &current);

    blocks.truncate(limit);
    blocks
}

fn push_block(blocks: &mut Vec<String>, block: &str) {
    let trimmed = block.trim();
    if !trimmed.is_empty() {
        blocks.push(trimmed.to_string());
    }
}
