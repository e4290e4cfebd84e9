//! Property tests for the link protocol decoder

use pov_protocol::{Command, LineParser, Message, SlotUpdate, MAX_MASK, SLOT_COUNT};
use proptest::prelude::*;

fn slot_update() -> impl Strategy<Value = SlotUpdate> {
    (0..SLOT_COUNT as u8, 0..=MAX_MASK).prop_map(|(index, mask)| SlotUpdate { index, mask })
}

proptest! {
    #[test]
    fn decoding_arbitrary_text_never_panics(line in "[a-z0-9.,A-F\\-]{0,64}") {
        let _ = Message::parse(&line);
    }

    #[test]
    fn display_pairs_decode_in_wire_order(updates in prop::collection::vec(slot_update(), 0..60)) {
        let mut line = String::from("10.0.0.1,10.0.0.2,display");
        for update in &updates {
            line.push_str(&format!(",{},{:X}", update.index, update.mask));
        }
        line.push('\n');

        let msg = Message::parse(&line).unwrap();
        let Command::Display(args) = msg.command else {
            panic!("expected display");
        };
        prop_assert_eq!(args.len(), updates.len());
        prop_assert_eq!(args.iter().collect::<Vec<_>>(), updates);
    }

    #[test]
    fn line_parser_splits_concatenated_lines(words in prop::collection::vec("[a-z]{1,12}", 1..10)) {
        let mut stream = Vec::new();
        for word in &words {
            stream.extend_from_slice(word.as_bytes());
            stream.push(b'\n');
        }

        let mut parser = LineParser::new();
        let mut seen = Vec::new();
        for byte in stream {
            if parser.feed(byte).unwrap() {
                seen.push(parser.line().to_string());
            }
        }
        prop_assert_eq!(seen, words);
    }
}
