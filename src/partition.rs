// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query partitioner: enumerates every way to segment a word sequence into
//! contiguous, non-empty groups.
//!
//! The source this was distilled from left the enumeration order
//! undocumented (see the open question in the design notes). This crate
//! fixes a canonical order: descending group count first (finest
//! partitions - one group per word - enumerated before coarsest), then
//! ascending left-to-right order of the boundary set, so the same input
//! always produces the same sequence and each partition is emitted exactly
//! once.

use crate::types::Partition;

/// All `2^(n-1)` partitions of a sequence of `n` words, in canonical
/// order. `n == 0` yields no partitions; `n == 1` yields the single
/// one-group partition.
pub fn enumerate_partitions(n: usize) -> Vec<Partition> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![Partition { groups: vec![0..1] }];
    }

    let gaps = n - 1;
    let mut masks: Vec<u32> = (0..(1u32 << gaps)).collect();
    masks.sort_by(|&a, &b| {
        b.count_ones().cmp(&a.count_ones()).then_with(|| {
            for g in 0..gaps {
                let bit_a = (a >> g) & 1;
                let bit_b = (b >> g) & 1;
                if bit_a != bit_b {
                    return bit_a.cmp(&bit_b);
                }
            }
            std::cmp::Ordering::Equal
        })
    });

    masks.into_iter().map(|mask| mask_to_partition(mask, n, gaps)).collect()
}

/// Bit `g` of `mask` means "split after word `g`" (0-based), i.e. a group
/// boundary between word `g` and word `g + 1`.
fn mask_to_partition(mask: u32, n: usize, gaps: usize) -> Partition {
    let mut groups = Vec::new();
    let mut start = 0;
    for g in 0..gaps {
        if (mask >> g) & 1 == 1 {
            groups.push(start..(g + 1));
            start = g + 1;
        }
    }
    groups.push(start..n);
    Partition { groups }
}
