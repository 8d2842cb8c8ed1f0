//! BBQr ("Better Bitcoin QR") fragment scheme
//!
//! Every part starts with an 8 character header:
//!
//! ```text
//! B$ <encoding> <file type> <total: 2 base36> <index: 2 base36> <body...>
//! ```
//!
//! Header validation and the hex / base32 / zlib decoding are done by the
//! `bbqr` crate. This module only maps its results onto the session types.

use bbqr::continuous_join::{ContinuousJoinResult, ContinuousJoiner};
use bbqr::file_type::FileType;
use bbqr::header::Header;
use log::debug;

use super::scheme::{Assembled, Fragment, FragmentHeader, FragmentScheme, SequenceId};
use crate::error::{Result, ScanError};
use crate::models::{ContentType, ScanPayload};

const HEADER_LEN: usize = 8;

fn content_type(file_type: FileType) -> ContentType {
    match file_type {
        FileType::Psbt => ContentType::Psbt,
        FileType::Transaction => ContentType::Transaction,
        FileType::Json => ContentType::Json,
        FileType::Cbor => ContentType::Cbor,
        FileType::UnicodeText => ContentType::UnicodeText,
    }
}

/// Part index from the last two header characters (upper-case base36)
fn part_index(digits: &str) -> Option<usize> {
    if !digits
        .bytes()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    {
        return None;
    }
    usize::from_str_radix(digits, 36).ok()
}

/// The BBQr container
#[derive(Debug, Clone, Copy, Default)]
pub struct Bbqr;

impl FragmentScheme for Bbqr {
    fn name(&self) -> &'static str {
        "bbqr"
    }

    fn parse(&self, payload: &ScanPayload) -> Option<Fragment> {
        let text = payload.as_text()?;
        let header = Header::try_from_str(text).ok()?;
        let fixed = text.get(..HEADER_LEN)?;
        let index = part_index(&fixed[6..8])?;

        // the joiner needs whole parts, so the body keeps its header
        Some(Fragment {
            header: FragmentHeader {
                sequence: SequenceId::new(&fixed[2..4]),
                total: header.num_parts as usize,
                index,
                content_type: Some(content_type(header.file_type)),
            },
            body: text.as_bytes().to_vec(),
        })
    }

    fn assemble(
        &self,
        header: &FragmentHeader,
        parts: Vec<Vec<u8>>,
        max_len: usize,
    ) -> Result<Assembled> {
        let mut joiner = ContinuousJoiner::new();
        let mut outcome = ContinuousJoinResult::NotStarted;
        for part in parts {
            let part = String::from_utf8(part)
                .map_err(|_| ScanError::AssemblyFailed("BBQr part is not text".to_string()))?;
            outcome = joiner
                .add_part(part)
                .map_err(|err| ScanError::AssemblyFailed(err.to_string()))?;
        }

        let joined = match outcome {
            ContinuousJoinResult::Complete(joined) => joined,
            ContinuousJoinResult::InProgress { parts_left } => {
                return Err(ScanError::AssemblyFailed(format!(
                    "BBQr joiner still missing {parts_left} parts"
                )));
            }
            ContinuousJoinResult::NotStarted => {
                return Err(ScanError::AssemblyFailed("no BBQr parts".to_string()));
            }
        };

        let data = joined.data;
        if data.len() > max_len {
            return Err(ScanError::AssemblyFailed(format!(
                "message of {} bytes exceeds the {} byte limit",
                data.len(),
                max_len
            )));
        }

        debug!(
            "bbqr: assembled {} bytes (sequence {}, {:?})",
            data.len(),
            header.sequence,
            header.content_type
        );

        let payload = match header.content_type {
            Some(content_type) if content_type.is_textual() => match String::from_utf8(data) {
                Ok(text) => ScanPayload::Text(text),
                Err(err) => ScanPayload::Binary(err.into_bytes()),
            },
            _ => ScanPayload::Binary(data),
        };

        Ok(Assembled {
            payload,
            content_type: header.content_type,
        })
    }
}
