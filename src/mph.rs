//! Minimal perfect hash tables.
//!
//! A table built from `n` keys has exactly `n` slots. Every key of the
//! original set resolves to its own slot with two hash evaluations and
//! one array read. Keys outside the set resolve to *some* slot, so
//! callers that cannot rule them out must use [`MphTable::get`], which
//! re-checks the stored key.

use log::debug;

use crate::error::MphError;
use crate::parser::Stream;
use crate::Result;

/// Upper bound for the secondary seed search of a single bucket.
pub const SEED_LIMIT: u32 = 1 << 16;

/// Two-round `lowbias32` integer hash.
#[inline]
pub const fn hash(key: u32, seed: u32) -> u32 {
    let mut h = key;
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846ca68b);
    h ^= h >> 16;

    h ^= seed;
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846ca68b);
    h ^= h >> 16;
    h
}

/// A static key to value table with collision-free lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MphTable<V> {
    seeds: Vec<i32>,
    keys: Vec<u32>,
    values: Vec<V>,
}

impl<V: Clone> MphTable<V> {
    /// Builds a table from unique keys.
    ///
    /// Buckets are filled largest first. A bucket holding a single key
    /// takes the first free slot and stores `-(slot + 1)` as its seed.
    /// Larger buckets search seeds from zero until all their keys land
    /// in distinct free slots.
    pub fn build(entries: &[(u32, V)]) -> Result<Self, MphError> {
        let n = entries.len();
        if n == 0 {
            return Ok(MphTable { seeds: Vec::new(), keys: Vec::new(), values: Vec::new() });
        }

        let mut sorted: Vec<u32> = entries.iter().map(|(k, _)| *k).collect();
        sorted.sort_unstable();
        if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(MphError::DuplicateKey(pair[0]));
        }

        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, (key, _)) in entries.iter().enumerate() {
            buckets[hash(*key, 0) as usize % n].push(i);
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|a, b| buckets[*b].len().cmp(&buckets[*a].len()).then(a.cmp(b)));

        let mut seeds = vec![0i32; n];
        let mut slots: Vec<Option<usize>> = vec![None; n];
        let mut next_free = 0;
        let mut placed = Vec::new();

        for bucket_index in order {
            let bucket = &buckets[bucket_index];
            match bucket.len() {
                0 => break,
                1 => {
                    while slots[next_free].is_some() {
                        next_free += 1;
                    }

                    slots[next_free] = Some(bucket[0]);
                    seeds[bucket_index] = -(next_free as i32 + 1);
                }
                _ => {
                    let seed = (0..SEED_LIMIT)
                        .find(|seed| {
                            placed.clear();
                            bucket.iter().all(|i| {
                                let slot = hash(entries[*i].0, *seed) as usize % n;
                                let free = slots[slot].is_none() && !placed.contains(&slot);
                                placed.push(slot);
                                free
                            })
                        })
                        .ok_or(MphError::SeedSearchExhausted {
                            bucket: bucket_index,
                            limit: SEED_LIMIT,
                        })?;

                    for (i, slot) in bucket.iter().zip(placed.iter()) {
                        slots[*slot] = Some(*i);
                    }

                    seeds[bucket_index] = seed as i32;
                }
            }
        }

        let mut keys = Vec::with_capacity(n);
        let mut values = Vec::with_capacity(n);
        for (slot, entry) in slots.iter().enumerate() {
            let index = entry.ok_or(MphError::Verification(slot as u32))?;
            keys.push(entries[index].0);
            values.push(entries[index].1.clone());
        }

        let table = MphTable { seeds, keys, values };
        for (key, _) in entries {
            if table.slot(*key).map(|slot| table.keys[slot]) != Some(*key) {
                return Err(MphError::Verification(*key));
            }
        }

        debug!("built a minimal perfect hash table with {} keys", n);
        Ok(table)
    }
}

impl<V> MphTable<V> {
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the slot `key` hashes to.
    ///
    /// Returns `None` only for an empty table.
    #[inline]
    pub fn slot(&self, key: u32) -> Option<usize> {
        let n = self.seeds.len();
        if n == 0 {
            return None;
        }

        let seed = self.seeds[hash(key, 0) as usize % n];
        let slot = if seed < 0 {
            (!seed) as usize
        } else {
            hash(key, seed as u32) as usize % n
        };

        (slot < n).then_some(slot)
    }

    /// Returns the value in the slot `key` hashes to, without checking
    /// that the slot belongs to `key`.
    #[inline]
    pub fn lookup_unchecked(&self, key: u32) -> Option<&V> {
        self.slot(key).and_then(|slot| self.values.get(slot))
    }

    /// Returns the value stored for `key`.
    #[inline]
    pub fn get(&self, key: u32) -> Option<&V> {
        let slot = self.slot(key)?;
        if self.keys.get(slot) == Some(&key) {
            self.values.get(slot)
        } else {
            None
        }
    }

    pub fn seeds(&self) -> &[i32] {
        &self.seeds
    }

    pub fn keys(&self) -> &[u32] {
        &self.keys
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }
}

impl MphTable<u32> {
    /// Serializes the table as `n` followed by the seed, key and value
    /// arrays, all little-endian.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(4 + self.len() * 12);
        data.extend_from_slice(&(self.len() as u32).to_le_bytes());
        for seed in &self.seeds {
            data.extend_from_slice(&seed.to_le_bytes());
        }
        for key in &self.keys {
            data.extend_from_slice(&key.to_le_bytes());
        }
        for value in &self.values {
            data.extend_from_slice(&value.to_le_bytes());
        }
        data
    }

    /// Reads a table written by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut s = Stream::new(data).swapped();
        let n = s.read_u32()? as usize;
        // Each entry needs 12 bytes, so a bogus count fails before allocating.
        let mut probe = s;
        probe.read_bytes(n.saturating_mul(12))?;

        let read_all = |s: &mut Stream| -> Result<Vec<u32>> {
            (0..n).map(|_| s.read_u32()).collect()
        };

        let seeds: Vec<i32> = read_all(&mut s)?.into_iter().map(|v| v as i32).collect();
        // A negative seed stores a slot directly as `-(slot + 1)`.
        if let Some((bucket, seed)) =
            seeds.iter().enumerate().find(|(_, seed)| **seed < 0 && (!**seed) as usize >= n)
        {
            return Err(MphError::InvalidSeed { bucket, seed: *seed }.into());
        }

        let keys = read_all(&mut s)?;
        let values = read_all(&mut s)?;
        Ok(MphTable { seeds, keys, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn check_round_trip(keys: &[u32]) {
        let entries: Vec<(u32, u32)> = keys.iter().map(|k| (*k, k.wrapping_mul(31) ^ 0x5a5a)).collect();
        let table = MphTable::build(&entries).unwrap();
        assert_eq!(table.len(), keys.len());
        for (key, value) in &entries {
            assert_eq!(table.get(*key), Some(value), "key {:#x}", key);
            assert_eq!(table.lookup_unchecked(*key), Some(value));
        }
    }

    #[test]
    fn hash_is_seeded() {
        assert_eq!(hash(0, 0), 0);
        assert_ne!(hash(1, 0), hash(1, 1));
        assert_eq!(hash(0x0644, 7), hash(0x0644, 7));
    }

    #[test]
    fn round_trip_all_sizes() {
        for n in 1..=300u32 {
            let keys: Vec<u32> = (0..n).map(|i| 0x0600 + i * 3).collect();
            check_round_trip(&keys);
        }
    }

    #[test]
    fn round_trip_sparse_keys() {
        let keys: Vec<u32> = (0..500u32).map(|i| i.wrapping_mul(2_654_435_761)).collect();
        check_round_trip(&keys);
    }

    #[test]
    fn crowded_bucket_needs_retries() {
        // Collect keys that all share one primary bucket, which forces the
        // seed search past seed zero.
        let n = 64;
        let target = hash(0, 0) as usize % n;
        let mut keys: Vec<u32> = (0u32..)
            .filter(|k| hash(*k, 0) as usize % n == target)
            .take(8)
            .collect();
        let mut filler = 1_000_000u32;
        while keys.len() < n {
            keys.push(filler);
            filler += 1;
        }

        let entries: Vec<(u32, usize)> = keys.iter().enumerate().map(|(i, k)| (*k, i)).collect();
        let table = MphTable::build(&entries).unwrap();
        assert!(table.seeds()[target] > 0);
        for (key, value) in &entries {
            assert_eq!(table.get(*key), Some(value));
        }
    }

    #[test]
    fn single_key() {
        let table = MphTable::build(&[(42, "x")]).unwrap();
        assert_eq!(table.seeds(), &[-1]);
        assert_eq!(table.get(42), Some(&"x"));
        assert_eq!(table.get(43), None);
        assert_eq!(table.lookup_unchecked(43), Some(&"x"));
    }

    #[test]
    fn empty_table() {
        let table = MphTable::<u32>::build(&[]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.get(1), None);
        assert_eq!(table.lookup_unchecked(1), None);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let result = MphTable::build(&[(1, 0u32), (2, 0), (1, 1)]);
        assert_eq!(result, Err(MphError::DuplicateKey(1)));
    }

    #[test]
    fn serialized_form() {
        let entries: Vec<(u32, u32)> = (0..40).map(|i| (0x0620 + i, i * 10)).collect();
        let table = MphTable::build(&entries).unwrap();
        let bytes = table.to_bytes();
        assert_eq!(bytes.len(), 4 + 40 * 12);
        assert_eq!(&bytes[..4], &40u32.to_le_bytes());

        let restored = MphTable::from_bytes(&bytes).unwrap();
        assert_eq!(restored, table);
        assert!(MphTable::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }

    fn serialized(seeds: &[i32], keys: &[u32], values: &[u32]) -> Vec<u8> {
        let mut data = (seeds.len() as u32).to_le_bytes().to_vec();
        data.extend(seeds.iter().flat_map(|v| v.to_le_bytes()));
        data.extend(keys.iter().flat_map(|v| v.to_le_bytes()));
        data.extend(values.iter().flat_map(|v| v.to_le_bytes()));
        data
    }

    #[test]
    fn direct_seed_out_of_range() {
        for seed in [i32::MIN, -2, -100] {
            let data = serialized(&[seed], &[42], &[7]);
            assert!(matches!(
                MphTable::from_bytes(&data),
                Err(Error::Mph(MphError::InvalidSeed { bucket: 0, .. }))
            ));
        }

        let table = MphTable::from_bytes(&serialized(&[-1], &[42], &[7])).unwrap();
        assert_eq!(table.get(42), Some(&7));
    }

    #[test]
    fn truncated_values() {
        let mut data = serialized(&[-1, -2], &[1, 2], &[10, 20]);
        data.truncate(data.len() - 4);
        assert!(matches!(MphTable::from_bytes(&data), Err(Error::StreamOverflow { .. })));

        // The count alone promises more entries than follow.
        assert!(MphTable::from_bytes(&u32::MAX.to_le_bytes()).is_err());
        assert!(MphTable::from_bytes(&[1, 0]).is_err());
    }

    #[test]
    fn empty_serialized_table() {
        let table = MphTable::<u32>::build(&[]).unwrap();
        let bytes = table.to_bytes();
        assert_eq!(bytes, [0, 0, 0, 0]);

        let restored = MphTable::from_bytes(&bytes).unwrap();
        assert!(restored.is_empty());
        assert_eq!(restored.get(0), None);
        assert_eq!(restored.lookup_unchecked(0x0644), None);
    }
}
