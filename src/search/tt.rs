use std::sync::Mutex;

use crate::board::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Clone, Copy, Debug)]
pub struct Entry {
    pub key: u64,
    pub depth: u32,
    pub score: i32,
    pub best: Option<Move>,
    pub bound: Bound,
    pub gen: u32,
}

const DEFAULT_WAYS: usize = 4;

#[derive(Default, Clone, Copy)]
struct Slot(Option<Entry>);

#[derive(Default)]
struct Bucket {
    slots: [Slot; DEFAULT_WAYS],
}

/// Bucketed transposition table. Buckets are individually mutex-guarded
/// so a table may be probed through `&self`; each search call owns its
/// own table, keeping results independent of thread timing.
#[derive(Default)]
pub struct Tt {
    buckets: Vec<Mutex<Bucket>>,
    gen: std::sync::atomic::AtomicU32,
}

impl Tt {
    pub fn new() -> Self {
        Self {
            buckets: Vec::new(),
            gen: std::sync::atomic::AtomicU32::new(0),
        }
    }

    pub fn with_capacity_entries(cap: usize) -> Self {
        let mut tt = Self::new();
        tt.set_capacity_entries(cap);
        tt
    }

    fn bucket_index(&self, key: u64) -> usize {
        let mixed = key ^ (key >> 32);
        (mixed as usize) % self.buckets.len().max(1)
    }

    pub fn get(&self, key: u64) -> Option<Entry> {
        if self.buckets.is_empty() {
            return None;
        }
        let idx = self.bucket_index(key);
        let g = self.buckets[idx].lock().unwrap();
        for slot in &g.slots {
            if let Some(e) = slot.0 {
                if e.key == key {
                    return Some(e);
                }
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        let mut count = 0;
        for b in &self.buckets {
            let g = b.lock().unwrap();
            for s in &g.slots {
                if s.0.is_some() {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set_capacity_entries(&mut self, cap: usize) {
        let entries = cap.max(DEFAULT_WAYS);
        let buckets = (entries + DEFAULT_WAYS - 1) / DEFAULT_WAYS;
        self.buckets.clear();
        self.buckets
            .resize_with(buckets, || Mutex::new(Bucket::default()));
    }

    pub fn put(&self, e: Entry) {
        if self.buckets.is_empty() {
            return;
        }
        let idx = self.bucket_index(e.key);
        let mut g = self.buckets[idx].lock().unwrap();
        let cur_gen = self.gen.load(std::sync::atomic::Ordering::Relaxed);
        let mut e = e;
        e.gen = cur_gen;
        // Replace same key if deeper
        for slot in &mut g.slots {
            if let Some(cur) = slot.0 {
                if cur.key == e.key {
                    if e.depth >= cur.depth {
                        slot.0 = Some(e);
                    }
                    return;
                }
            }
        }
        // Empty slot first
        for slot in &mut g.slots {
            if slot.0.is_none() {
                slot.0 = Some(e);
                return;
            }
        }
        // Replace lowest depth, then oldest generation
        let mut victim = 0usize;
        let mut best_key = (u32::MAX, u32::MAX);
        for (i, slot) in g.slots.iter().enumerate() {
            if let Some(cur) = slot.0 {
                let key = (cur.depth, cur.gen);
                if key < best_key {
                    best_key = key;
                    victim = i;
                }
            }
        }
        g.slots[victim].0 = Some(e);
    }

    pub fn bump_generation(&self) {
        let _ = self
            .gen
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    }
}
