//! End-to-end build/parse round trips over the ring buffer.

use cff_codec::{frame_size, parse_frames, FrameBuilder, RingBuffer, MAX_PAYLOAD_SIZE};

fn collect_frames(ring: &mut RingBuffer<Vec<u8>>) -> Vec<(u16, Vec<u8>)> {
    let mut seen = Vec::new();
    parse_frames(ring, |frame| {
        let mut payload = vec![0u8; frame.payload_len()];
        frame.copy_payload(&mut payload).unwrap();
        seen.push((frame.frame_counter(), payload));
    });
    seen
}

#[test]
fn representative_payload_shapes_round_trip() {
    let payloads: Vec<Vec<u8>> = vec![
        Vec::new(),
        b"Hello".to_vec(),
        b"{\"k\":1}".to_vec(),
        vec![0u8; 64],
        (0u16..=255).map(|b| b as u8).collect(),
        vec![0xFF; 1000],
    ];

    let mut builder = FrameBuilder::new(vec![0u8; frame_size(1000)]).unwrap();
    let mut ring = RingBuffer::new(vec![0u8; 8192]).unwrap();
    for payload in &payloads {
        let frame = builder.build(payload).unwrap();
        ring.append(frame).unwrap();
    }

    let seen = collect_frames(&mut ring);
    assert_eq!(seen.len(), payloads.len());
    for (index, (counter, payload)) in seen.iter().enumerate() {
        assert_eq!(*counter as usize, index);
        assert_eq!(payload, &payloads[index]);
    }
}

#[test]
fn all_256_byte_values_survive_the_trip() {
    let payload: Vec<u8> = (0u16..=255).map(|b| b as u8).collect();

    let mut builder = FrameBuilder::new(vec![0u8; 512]).unwrap();
    let mut ring = RingBuffer::new(vec![0u8; 512]).unwrap();
    ring.append(builder.build(&payload).unwrap()).unwrap();

    let seen = collect_frames(&mut ring);
    assert_eq!(seen.len(), 1);

    let copied = &seen[0].1;
    assert_eq!(copied, &payload);
    assert_eq!(copied[0], 0x00);
    assert_eq!(copied[127], 0x7F);
    assert_eq!(copied[128], 0x80);
    assert_eq!(copied[255], 0xFF);
}

#[test]
fn maximum_payload_round_trips() {
    let payload: Vec<u8> = (0..MAX_PAYLOAD_SIZE).map(|i| (i % 251) as u8).collect();

    let mut builder = FrameBuilder::new(vec![0u8; frame_size(MAX_PAYLOAD_SIZE)]).unwrap();
    let mut ring = RingBuffer::new(vec![0u8; 2 * frame_size(MAX_PAYLOAD_SIZE)]).unwrap();
    ring.append(builder.build(&payload).unwrap()).unwrap();

    let seen = collect_frames(&mut ring);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].1, payload);
}

#[test]
fn payloads_full_of_preamble_bytes_round_trip() {
    let payloads: Vec<Vec<u8>> = vec![
        vec![0xFA, 0xCE, 0x00, 0x01, 0x02],
        vec![0xFA; 32],
        [0xFA, 0xCE].repeat(16),
        b"\xFA\xCE embedded \xFA\xCE markers \xFA\xCE".to_vec(),
    ];

    let mut builder = FrameBuilder::new(vec![0u8; 128]).unwrap();
    let mut ring = RingBuffer::new(vec![0u8; 1024]).unwrap();
    for payload in &payloads {
        ring.append(builder.build(payload).unwrap()).unwrap();
    }

    let seen = collect_frames(&mut ring);
    assert_eq!(seen.len(), payloads.len());
    for (index, (_, payload)) in seen.iter().enumerate() {
        assert_eq!(payload, &payloads[index]);
    }
}

#[test]
fn counter_wrap_is_visible_on_the_wire() {
    let mut builder = FrameBuilder::new(vec![0u8; 32]).unwrap();
    builder.set_frame_counter(65534);

    let mut ring = RingBuffer::new(vec![0u8; 128]).unwrap();
    for _ in 0..3 {
        ring.append(builder.build(b"test").unwrap()).unwrap();
    }

    let seen = collect_frames(&mut ring);
    let counters: Vec<u16> = seen.iter().map(|(counter, _)| *counter).collect();
    assert_eq!(counters, [65534, 65535, 0]);
    for (_, payload) in &seen {
        assert_eq!(payload, b"test");
    }
}

#[test]
fn chunked_feeding_delivers_every_frame_once() {
    let payloads: Vec<Vec<u8>> = (0..8)
        .map(|i| format!("message number {i}").into_bytes())
        .collect();

    let mut builder = FrameBuilder::new(vec![0u8; 64]).unwrap();
    let mut stream = Vec::new();
    for payload in &payloads {
        stream.extend_from_slice(builder.build(payload).unwrap());
    }

    // Feed in 3-byte chunks, scanning after every append.
    let mut ring = RingBuffer::new(vec![0u8; 512]).unwrap();
    let mut seen = Vec::new();
    for chunk in stream.chunks(3) {
        ring.append(chunk).unwrap();
        parse_frames(&mut ring, |frame| {
            let mut payload = vec![0u8; frame.payload_len()];
            frame.copy_payload(&mut payload).unwrap();
            seen.push(payload);
        });
    }

    assert_eq!(seen, payloads);
}

#[test]
fn small_ring_wraps_many_times_under_continuous_feed() {
    let payloads: Vec<Vec<u8>> = (0..10)
        .map(|i| format!("wrap {i}").into_bytes())
        .collect();

    let mut builder = FrameBuilder::new(vec![0u8; 64]).unwrap();
    let mut stream = Vec::new();
    for payload in &payloads {
        stream.extend_from_slice(builder.build(payload).unwrap());
    }

    // A ring barely bigger than one frame forces payloads across the wrap
    // boundary over and over.
    let mut ring = RingBuffer::new(vec![0u8; 24]).unwrap();
    let mut seen = Vec::new();
    let mut pos = 0;
    while pos < stream.len() {
        let n = ring.free_space().min(stream.len() - pos);
        ring.append(&stream[pos..pos + n]).unwrap();
        pos += n;
        parse_frames(&mut ring, |frame| {
            let mut payload = vec![0u8; frame.payload_len()];
            frame.copy_payload(&mut payload).unwrap();
            seen.push(payload);
        });
    }

    assert_eq!(seen, payloads);
    assert!(ring.is_empty());
}
