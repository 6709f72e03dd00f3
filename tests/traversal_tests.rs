//! Randomized traversal tests - arbitrary pointer graphs, cycles included.

use block_slack::container::{decode_varint, encode_varint, varint::encoded_len, walk_blocks};
use block_slack::slack::locate_regions;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Cursor;

/// Distance between block start offsets.
const SLOT: u64 = 64;

/// A generated container and the graph it encodes.
struct Fixture {
    data: Vec<u8>,
    edges: Vec<Vec<usize>>,
    sizes: Vec<u64>,
}

/// Build `count` blocks at fixed slots with random edges between them.
///
/// Block 0 is the root. Nothing ever points at it, since a zero pointer
/// ends the pointer list.
fn random_fixture(rng: &mut StdRng, count: usize) -> Fixture {
    let mut data = vec![0xEEu8; count * SLOT as usize + rng.gen_range(0..32)];
    let mut edges = Vec::with_capacity(count);
    let mut sizes = Vec::with_capacity(count);

    for index in 0..count {
        let targets: Vec<usize> = (0..rng.gen_range(0..5))
            .map(|_| rng.gen_range(1..count.max(2)))
            .filter(|&target| target < count)
            .collect();

        let mut body = Vec::new();
        for &target in &targets {
            encode_varint(target as u64 * SLOT, &mut body);
        }
        body.push(0x00);
        body.extend(std::iter::repeat(b'#').take(rng.gen_range(1..8)));

        let mut size = body.len() as u64 + 1;
        while encoded_len(size) as u64 + body.len() as u64 != size {
            size = encoded_len(size) as u64 + body.len() as u64;
        }

        let mut block = Vec::new();
        encode_varint(size, &mut block);
        block.extend_from_slice(&body);
        assert!(block.len() as u64 <= SLOT);

        let start = index * SLOT as usize;
        data[start..start + block.len()].copy_from_slice(&block);

        edges.push(targets);
        sizes.push(size);
    }

    Fixture { data, edges, sizes }
}

fn reachable(edges: &[Vec<usize>]) -> BTreeSet<usize> {
    let mut seen = BTreeSet::new();
    let mut pending = vec![0usize];
    while let Some(node) = pending.pop() {
        if seen.insert(node) {
            pending.extend(&edges[node]);
        }
    }
    seen
}

#[test]
fn test_random_graphs_complete_and_visited_once() {
    let mut rng = StdRng::seed_from_u64(0x5EED);

    for _ in 0..200 {
        let count = rng.gen_range(1..40);
        let fixture = random_fixture(&mut rng, count);
        let expected = reachable(&fixture.edges);

        let mut visits: HashMap<u64, usize> = HashMap::new();
        let table = walk_blocks(&mut Cursor::new(&fixture.data), 0, |block| {
            *visits.entry(block.offset).or_default() += 1;
        })
        .unwrap();

        let expected_table: BTreeMap<u64, u64> = expected
            .iter()
            .map(|&index| (index as u64 * SLOT, fixture.sizes[index]))
            .collect();
        let actual_table: BTreeMap<u64, u64> = table.iter().collect();
        assert_eq!(actual_table, expected_table);

        assert_eq!(visits.len(), expected.len());
        assert!(visits.values().all(|&n| n == 1), "block read twice: {visits:?}");
    }
}

#[test]
fn test_random_graph_slack_covers_everything_else() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..50 {
        let count = rng.gen_range(2..30);
        let fixture = random_fixture(&mut rng, count);
        let table = walk_blocks(&mut Cursor::new(&fixture.data), 0, |_| {}).unwrap();
        let spans = locate_regions(&table, fixture.data.len() as u64);

        // Slots never overlap, so live bytes plus slack bytes is the whole file.
        let slack: u64 = spans.iter().map(|s| s.len()).sum();
        assert_eq!(slack + table.total_size(), fixture.data.len() as u64);

        let starts: Vec<u64> = spans.iter().map(|s| s.start).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
    }
}

#[test]
fn test_long_chain_does_not_recurse() {
    // 0 -> 1 -> 2 -> ... -> n-1, deep enough to overflow a recursive walk.
    let count = 20_000usize;
    let slot = 8usize;
    let mut data = vec![0u8; count * slot];

    for index in 0..count {
        let mut body = Vec::new();
        if index + 1 < count {
            encode_varint(((index + 1) * slot) as u64, &mut body);
        }
        body.push(0x00);
        body.push(b'.');
        let size = body.len() as u64 + 1;

        let start = index * slot;
        data[start] = size as u8;
        data[start + 1..start + 1 + body.len()].copy_from_slice(&body);
    }

    let table = walk_blocks(&mut Cursor::new(&data), 0, |_| {}).unwrap();
    assert_eq!(table.len(), count);
}

#[test]
fn test_random_varint_roundtrip() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..2_000 {
        let bits = rng.gen_range(0..=64u32);
        let value = if bits == 0 { 0 } else { rng.gen::<u64>() >> (64 - bits) };

        let mut buf = vec![0xAA; rng.gen_range(0..4)];
        let offset = buf.len() as u64;
        encode_varint(value, &mut buf);
        buf.push(0x01);

        let varint = decode_varint(&mut Cursor::new(&buf), offset).unwrap();
        assert_eq!(varint.value, value);
        assert_eq!(varint.byte_length, encoded_len(value));
    }
}
