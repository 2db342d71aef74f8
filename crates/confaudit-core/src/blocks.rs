use regex::Regex;

/// Extract contiguous configuration blocks anchored by a header line.
///
/// A line matching `header` opens a block. Lines are appended until either a
/// bare `!` terminator (consumed, not appended) or a line starting with an
/// unindented alphabetic character, which closes the block and is re-examined
/// as a candidate header for the next one. Repeated headers yield multiple
/// blocks.
pub fn extract_blocks(cfg: &str, header: &Regex) -> Vec<String> {
    let lines: Vec<&str> = cfg.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if !header.is_match(lines[i]) {
            i += 1;
            continue;
        }

        let mut block = vec![lines[i]];
        i += 1;

        while i < lines.len() {
            let line = lines[i];
            if line.trim() == "!" {
                i += 1;
                break;
            }
            if line.starts_with(|c: char| c.is_ascii_alphabetic()) {
                break;
            }
            block.push(line);
            i += 1;
        }

        blocks.push(block.join("\n"));
    }

    blocks
}
