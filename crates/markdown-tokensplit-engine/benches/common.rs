// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with some content.\n\n- Bullet point\n  - Nested item\n- Another item\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_long_prose(words: usize) -> String {
    let mut content = String::from("# Long section\n\n");
    let sentence = ["The", "packer", "falls", "back", "to", "word", "splitting", "here."];
    content.push_str(
        &sentence
            .iter()
            .cycle()
            .take(words)
            .copied()
            .collect::<Vec<_>>()
            .join(" "),
    );
    content
}

#[allow(dead_code)]
pub fn generate_large_code_block(lines: usize) -> String {
    let body: Vec<String> = (0..lines)
        .map(|i| format!("    let value_{i} = compute({i});"))
        .collect();
    format!("```rust\nfn main() {{\n{}\n}}\n```\n", body.join("\n"))
}
