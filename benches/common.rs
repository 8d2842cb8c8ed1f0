#![allow(dead_code)]

use bbqr::encode::Encoding;
use bbqr::file_type::FileType;
use bbqr::qr::Version;
use bbqr::split::{Split, SplitOptions};

/// Pack `data` as one byte-mode segment for `version`, padded to whole
/// codewords.
pub fn byte_mode_codewords(data: &[u8], version: i32) -> Vec<u8> {
    let count_bits = if version <= 9 { 8 } else { 16 };
    let mut bits: Vec<bool> = Vec::with_capacity(4 + count_bits + data.len() * 8);
    push_bits(&mut bits, 0b0100, 4);
    push_bits(&mut bits, data.len() as u32, count_bits);
    for &b in data {
        push_bits(&mut bits, b as u32, 8);
    }
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &bit)| acc | ((bit as u8) << (7 - i)))
        })
        .collect()
}

fn push_bits(bits: &mut Vec<bool>, value: u32, width: usize) {
    for i in (0..width).rev() {
        bits.push((value >> i) & 1 == 1);
    }
}

/// Split `message` into about `parts` zlib BBQr fragments of a PSBT
pub fn bbqr_parts(message: &[u8], parts: usize) -> Vec<String> {
    let options = SplitOptions {
        encoding: Encoding::Zlib,
        min_split_number: parts.max(1),
        max_split_number: parts.max(1) * 2,
        min_version: Version::V01,
        max_version: Version::V40,
    };
    Split::try_from_data(message, FileType::Psbt, options)
        .expect("split benchmark message")
        .parts
}
