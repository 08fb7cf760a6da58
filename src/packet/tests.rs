#[cfg(test)]
mod tests {
    use crate::packet::{Encoding, Packet};

    #[test]
    fn primitive_round_trips() {
        let mut packet = Packet::new();
        packet.write_i16(-1234);
        packet.write_i32(0x1234_5678);
        packet.write_i64(-9_000_000_000);
        packet.write_f32(3.5);

        assert_eq!(packet.read_i16(), -1234);
        assert_eq!(packet.read_i32(), 0x1234_5678);
        assert_eq!(packet.read_i64(), -9_000_000_000);
        assert_eq!(packet.read_f32(), 3.5);
        assert_eq!(packet.unread_len(), 0);
    }

    #[test]
    fn wire_layout_is_little_endian() {
        let mut packet = Packet::new();
        packet.write_i32(42);
        packet.write_string("hi");

        // 4-byte LE value, then 4-byte LE byte count, then raw characters
        assert_eq!(
            packet.to_bytes(),
            vec![42, 0, 0, 0, 2, 0, 0, 0, b'h', b'i']
        );
    }

    #[test]
    fn raw_bytes_are_unframed() {
        let mut packet = Packet::new();
        packet.write_bytes(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(packet.len(), 4);
        assert_eq!(packet.read_bytes(4), vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn string_round_trips() {
        let mut packet = Packet::new();
        packet.write_string("hello relay");
        assert_eq!(packet.read_string(), "hello relay");
    }

    #[test]
    fn empty_string_round_trips() {
        let mut packet = Packet::new();
        packet.write_string("");
        assert_eq!(packet.len(), 4);
        assert_eq!(packet.read_string(), "");
    }

    #[test]
    fn ascii_substitutes_out_of_table_characters() {
        let mut packet = Packet::new();
        packet.write_string("héllo");
        // One byte per character, non-ASCII replaced on the way in
        assert_eq!(packet.read_string(), "h?llo");
    }

    #[test]
    fn latin1_preserves_high_bytes() {
        let mut packet = Packet::new();
        packet.write_string_with("héllo", Encoding::Latin1);
        assert_eq!(packet.read_string_with(Encoding::Latin1), "héllo");
    }

    #[test]
    fn array_round_trips() {
        let mut packet = Packet::new();
        packet.write_i16_array(&[1, -2, 3]);
        packet.write_i32_array(&[i32::MIN, 0, i32::MAX]);
        packet.write_i64_array(&[i64::MIN, i64::MAX]);
        packet.write_f32_array(&[0.5, -0.25]);
        packet.write_string_array(&["a", "", "relay"]);

        assert_eq!(packet.try_read_i16_array(), Some(vec![1, -2, 3]));
        assert_eq!(packet.try_read_i32_array(), Some(vec![i32::MIN, 0, i32::MAX]));
        assert_eq!(packet.try_read_i64_array(), Some(vec![i64::MIN, i64::MAX]));
        assert_eq!(packet.try_read_f32_array(), Some(vec![0.5, -0.25]));
        assert_eq!(
            packet.try_read_string_array(),
            Some(vec!["a".to_string(), String::new(), "relay".to_string()])
        );
        assert_eq!(packet.unread_len(), 0);
    }

    #[test]
    fn empty_arrays_round_trip() {
        let mut packet = Packet::new();
        packet.write_i32_array(&[]);
        assert_eq!(packet.len(), 4);
        assert_eq!(packet.try_read_i32_array(), Some(Vec::new()));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn unchecked_read_past_end_panics() {
        let mut packet = Packet::from_bytes(&[1, 2]);
        packet.read_i32();
    }

    #[test]
    fn checked_reads_fail_without_advancing() {
        let mut packet = Packet::new();
        packet.write_i16(0x0102);

        assert_eq!(packet.try_read_i32(), None);
        assert_eq!(packet.try_read_i64(), None);
        assert_eq!(packet.try_read_f32(), None);
        assert_eq!(packet.try_read_bytes(3), None);
        // The earlier failures consumed nothing
        assert_eq!(packet.try_read_i16(), Some(0x0102));
    }

    #[test]
    fn short_length_prefix_is_an_overall_failure() {
        // Too few bytes for the 4-byte prefix itself: failure, not an
        // empty-success
        let mut packet = Packet::from_bytes(&[1, 2]);
        assert_eq!(packet.try_read_string(), None);
        assert_eq!(packet.try_read_i32_array(), None);
        assert_eq!(packet.unread_len(), 2);
    }

    #[test]
    fn truncated_string_restores_cursor() {
        let mut packet = Packet::new();
        packet.write_i32(10);
        packet.write_bytes(b"ab");

        assert_eq!(packet.try_read_string(), None);
        // The consumed prefix was restored, so unrelated reads still work
        assert_eq!(packet.try_read_i32(), Some(10));
        assert_eq!(packet.try_read_bytes(2), Some(b"ab".to_vec()));
    }

    #[test]
    fn truncated_array_element_restores_cursor() {
        let mut packet = Packet::new();
        packet.write_i32(3);
        packet.write_i16(7);

        assert_eq!(packet.try_read_i16_array(), None);
        assert_eq!(packet.try_read_i32(), Some(3));
    }

    #[test]
    fn negative_length_prefix_is_a_failure() {
        let mut packet = Packet::new();
        packet.write_i32(-1);
        assert_eq!(packet.try_read_string(), None);
        assert_eq!(packet.try_read_i16_array(), None);
        assert_eq!(packet.try_read_i32(), Some(-1));
    }

    #[test]
    fn oversized_count_fails_before_allocating() {
        let mut packet = Packet::new();
        packet.write_i32(i32::MAX);
        assert_eq!(packet.try_read_i64_array(), None);
    }

    #[test]
    fn clear_makes_the_packet_reusable() {
        let mut packet = Packet::new();
        packet.write_i64(99);
        assert_eq!(packet.read_i64(), 99);

        packet.clear();
        assert_eq!(packet.len(), 0);
        assert_eq!(packet.unread_len(), 0);

        packet.write_i16(5);
        assert_eq!(packet.read_i16(), 5);
    }

    #[test]
    fn from_bytes_starts_with_cursor_at_zero() {
        let packet = Packet::from_bytes(&[9, 8, 7]);
        assert_eq!(packet.len(), 3);
        assert_eq!(packet.unread_len(), 3);
    }

    #[test]
    fn interleaved_fields_read_back_in_order() {
        let mut packet = Packet::new();
        packet.write_string("pos");
        packet.write_f32_array(&[1.0, 2.0, 3.0]);
        packet.write_i64(1_700_000_000);

        assert_eq!(packet.read_string(), "pos");
        assert_eq!(packet.try_read_f32_array(), Some(vec![1.0, 2.0, 3.0]));
        assert_eq!(packet.read_i64(), 1_700_000_000);
    }
}
