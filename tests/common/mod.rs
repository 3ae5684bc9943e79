#![allow(dead_code)]
use assert_fs::{TempDir, prelude::*};
use ratatui::buffer::Buffer;
use std::path::PathBuf;

/// Builds a fixture tree:
/// root/
///   notes/inner.md
///   Archive/          (empty)
///   .hidden/kept.md
///   A.txt, b.md, README (plain text, no extension)
///   .secret.md, photo.png, bundle.zip, blob (binary, no extension)
pub fn template_tree() -> TempDir {
    let td = TempDir::new().unwrap();
    td.child("notes/inner.md").write_str("# inner\n").unwrap();
    td.child("Archive").create_dir_all().unwrap();
    td.child(".hidden/kept.md").write_str("hidden\n").unwrap();
    td.child("A.txt").write_str("alpha template\n").unwrap();
    td.child("b.md").write_str("# Bravo\n\nbody\n").unwrap();
    td.child("README").write_str("read me first\n").unwrap();
    td.child(".secret.md").write_str("secret\n").unwrap();
    td.child("photo.png")
        .write_binary(&[0x89, b'P', b'N', b'G', 0, 0])
        .unwrap();
    td.child("bundle.zip")
        .write_binary(&[b'P', b'K', 3, 4, 0])
        .unwrap();
    td.child("blob").write_binary(&[0u8, 1, 2, 3, 255]).unwrap();
    td
}

/// Canonical root of a fixture, matching what the picker prints.
pub fn root_of(td: &TempDir) -> PathBuf {
    dunce::canonicalize(td.path()).unwrap()
}

/// All rows of a rendered buffer as strings.
pub fn rows(buffer: &Buffer) -> Vec<String> {
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|c| c.symbol()).collect())
        .collect()
}

/// Cell position of the first occurrence of `needle`.
pub fn find_text(
    buffer: &Buffer,
    needle: &str,
) -> Option<(u16, u16)> {
    let width = buffer.area.width as usize;
    let chars: Vec<String> = needle.chars().map(|c| c.to_string()).collect();
    for (y, row) in buffer.content.chunks(width).enumerate() {
        let symbols: Vec<&str> = row.iter().map(|c| c.symbol()).collect();
        if chars.len() > symbols.len() {
            continue;
        }
        for x in 0..=symbols.len() - chars.len() {
            if symbols[x..x + chars.len()]
                .iter()
                .zip(&chars)
                .all(|(s, c)| *s == c.as_str())
            {
                return Some((x as u16, y as u16));
            }
        }
    }
    None
}
