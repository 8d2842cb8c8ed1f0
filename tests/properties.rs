mod common;

use common::{byte_mode_codewords, hex_fragments};
use proptest::prelude::*;
use qr_ingest::decoder::{BitCursor, PayloadExtractor};
use qr_ingest::multipart::bbqr::Bbqr;
use qr_ingest::{
    Detection, IgnoreReason, MultiPartSession, ScanConfig, ScanMode, ScanPayload, ScanSession,
    SessionEvent,
};
use std::time::{Duration, Instant};

/// Fragment bodies plus a delivery order: a permutation of every index with
/// extra repeats spliced in at arbitrary positions
fn delivery() -> impl Strategy<Value = (Vec<Vec<u8>>, Vec<usize>)> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 1..6), 2..12).prop_flat_map(
        |bodies| {
            let total = bodies.len();
            let order = Just((0..total).collect::<Vec<_>>()).prop_shuffle();
            let repeats = prop::collection::vec((0..total, any::<prop::sample::Index>()), 0..8);
            (Just(bodies), order, repeats).prop_map(|(bodies, mut order, repeats)| {
                for (index, at) in repeats {
                    let pos = at.index(order.len() + 1);
                    order.insert(pos, index);
                }
                (bodies, order)
            })
        },
    )
}

proptest! {
    #[test]
    fn test_byte_mode_round_trip(
        data in prop::collection::vec(any::<u8>(), 0..400),
        version in 1i32..=40,
    ) {
        prop_assume!(version >= 10 || data.len() <= 255);
        let codewords = byte_mode_codewords(&data, version);
        prop_assert_eq!(PayloadExtractor::decode(&codewords, version).unwrap(), data);
    }

    #[test]
    fn test_truncation_never_panics(
        data in prop::collection::vec(any::<u8>(), 1..100),
        version in 1i32..=40,
        cut in any::<prop::sample::Index>(),
    ) {
        let codewords = byte_mode_codewords(&data, version);
        let keep = cut.index(codewords.len());
        prop_assert!(PayloadExtractor::decode(&codewords[..keep], version).is_err());
    }

    #[test]
    fn test_cursor_reads_compose(
        bytes in prop::collection::vec(any::<u8>(), 4..16),
        a in 1usize..=16,
        b in 1usize..=16,
    ) {
        let mut split = BitCursor::with_offset(bytes.clone(), 0);
        let hi = split.next(a).unwrap();
        let lo = split.next(b).unwrap();

        let mut whole = BitCursor::with_offset(bytes, 0);
        prop_assert_eq!(whole.next(a + b).unwrap(), (hi << b) | lo);
        prop_assert_eq!(split.offset(), whole.offset());
    }

    #[test]
    fn test_once_emits_at_most_the_first(
        texts in prop::collection::vec("[a-z]{1,6}", 1..20),
    ) {
        let t0 = Instant::now();
        let mut session = ScanSession::new(ScanConfig::new(ScanMode::Once));
        let delivered: Vec<_> = texts
            .iter()
            .enumerate()
            .filter_map(|(i, text)| {
                let at = t0 + Duration::from_millis(i as u64 * 50);
                match session.push(Detection::text(text.as_str(), at)) {
                    SessionEvent::Complete(c) => Some(c.payload),
                    _ => None,
                }
            })
            .collect();
        prop_assert_eq!(delivered, vec![ScanPayload::from(texts[0].as_str())]);
    }

    #[test]
    fn test_once_per_code_emits_each_code_once(
        texts in prop::collection::vec(prop::sample::select(vec!["x", "y", "z", "w"]), 1..40),
    ) {
        let t0 = Instant::now();
        let mut session = ScanSession::new(ScanConfig::new(ScanMode::OncePerCode));
        let mut delivered = Vec::new();
        for text in &texts {
            if let SessionEvent::Complete(c) = session.push(Detection::text(*text, t0)) {
                delivered.push(c.payload);
            }
        }

        let mut expected: Vec<ScanPayload> = Vec::new();
        for text in &texts {
            let payload = ScanPayload::from(*text);
            if !expected.contains(&payload) {
                expected.push(payload);
            }
        }
        prop_assert_eq!(delivered, expected);
    }

    #[test]
    fn test_any_delivery_order_completes_once((bodies, order) in delivery()) {
        let fragments = hex_fragments(&bodies);
        let mut session = MultiPartSession::new(Box::new(Bbqr), 1 << 20);
        let mut seen = std::collections::HashSet::new();
        let mut completions = Vec::new();

        for &index in &order {
            let event = session.accept(ScanPayload::from(fragments[index].as_str()));
            let fresh = seen.insert(index);
            let finished_before = completions.len() == 1;
            match event {
                SessionEvent::Complete(c) => completions.push(c.payload),
                SessionEvent::Progress(p) => {
                    prop_assert!(fresh);
                    prop_assert_eq!(p.parts_remaining, bodies.len() - seen.len());
                }
                SessionEvent::Ignored(IgnoreReason::DuplicateFragment) => {
                    prop_assert!(!fresh);
                }
                SessionEvent::Ignored(IgnoreReason::MultiPartComplete) => {
                    prop_assert!(finished_before);
                }
                other => prop_assert!(false, "unexpected event {:?}", other),
            }
        }

        prop_assert_eq!(completions.len(), 1);
        let expected = bodies.concat();
        prop_assert_eq!(completions[0].as_bytes(), expected.as_slice());
    }
}
