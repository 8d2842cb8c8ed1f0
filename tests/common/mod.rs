#![allow(dead_code)]

use bbqr::encode::Encoding;
use bbqr::file_type::FileType;
use bbqr::qr::Version;
use bbqr::split::{Split, SplitOptions};
use std::time::{Duration, Instant};

/// Pack `data` as one byte-mode segment for `version`
pub fn byte_mode_codewords(data: &[u8], version: i32) -> Vec<u8> {
    let count_bits = if version <= 9 { 8 } else { 16 };
    let mut bits = Vec::new();
    push_bits(&mut bits, 0b0100, 4);
    push_bits(&mut bits, data.len() as u32, count_bits);
    for &b in data {
        push_bits(&mut bits, b as u32, 8);
    }
    to_codewords(&bits)
}

pub fn push_bits(bits: &mut Vec<bool>, value: u32, width: usize) {
    for i in (0..width).rev() {
        bits.push((value >> i) & 1 == 1);
    }
}

pub fn to_codewords(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &bit)| acc | ((bit as u8) << (7 - i)))
        })
        .collect()
}

pub fn base36(n: usize) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    format!(
        "{}{}",
        DIGITS[(n / 36) % 36] as char,
        DIGITS[n % 36] as char
    )
}

pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

/// One hex-encoded BBQr PSBT fragment per body
pub fn hex_fragments(bodies: &[Vec<u8>]) -> Vec<String> {
    bodies
        .iter()
        .enumerate()
        .map(|(index, body)| {
            format!(
                "B$HP{}{}{}",
                base36(bodies.len()),
                base36(index),
                hex(body)
            )
        })
        .collect()
}

/// Zlib-encoded BBQr parts for `message`, forced into several small
/// symbols
pub fn zlib_fragments(message: &[u8], file_type: FileType) -> Vec<String> {
    let split = Split::try_from_data(
        message,
        file_type,
        SplitOptions {
            encoding: Encoding::Zlib,
            min_split_number: 2,
            max_split_number: 30,
            min_version: Version::V01,
            max_version: Version::V05,
        },
    )
    .unwrap();
    assert!(split.parts.len() >= 2, "expected a multi-part split");
    split.parts
}

pub fn ms(base: Instant, millis: u64) -> Instant {
    base + Duration::from_millis(millis)
}
