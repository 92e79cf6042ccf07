//! Sharded map used to accumulate per-document scores from many threads.
//!
//! Keys are spread over a fixed number of buckets (`key mod bucket_count`),
//! each behind its own mutex, so writers touching different buckets never
//! contend.

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;

/// Integer keys that can be assigned to a bucket.
pub trait BucketKey: Copy + Ord {
    fn bucket_hash(self) -> u64;
}

macro_rules! impl_bucket_key {
    ($($t:ty),*) => {
        $(impl BucketKey for $t {
            #[inline]
            fn bucket_hash(self) -> u64 {
                self as u64
            }
        })*
    };
}

impl_bucket_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Exclusive access to one value slot. The bucket stays locked until this is dropped.
pub type Access<'a, V> = MappedMutexGuard<'a, V>;

pub struct ConcurrentMap<K, V> {
    buckets: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K: BucketKey, V> ConcurrentMap<K, V> {
    /// A zero `bucket_count` is raised to one.
    pub fn new(bucket_count: usize) -> Self {
        let buckets = (0..bucket_count.max(1))
            .map(|_| Mutex::new(BTreeMap::new()))
            .collect();
        Self { buckets }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bucket(&self, key: K) -> &Mutex<BTreeMap<K, V>> {
        let index = key.bucket_hash() % self.buckets.len() as u64;
        &self.buckets[index as usize]
    }

    /// Locks the key's bucket and returns its value slot, inserting a default
    /// value when the key is absent.
    pub fn access(&self, key: K) -> Access<'_, V>
    where
        V: Default,
    {
        MutexGuard::map(self.bucket(key).lock(), |map| map.entry(key).or_default())
    }

    pub fn erase(&self, key: K) {
        self.bucket(key).lock().remove(&key);
    }

    /// Merges all buckets into one ordered map, locking one bucket at a time.
    /// Only consistent once concurrent writers have finished.
    pub fn snapshot(&self) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        let mut result = BTreeMap::new();
        for bucket in &self.buckets {
            let guard = bucket.lock();
            result.extend(guard.iter().map(|(k, v)| (*k, v.clone())));
        }
        result
    }

    /// Consumes the map, merging buckets without locking.
    pub fn into_ordered(self) -> BTreeMap<K, V> {
        let mut result = BTreeMap::new();
        for bucket in self.buckets {
            result.append(&mut bucket.into_inner());
        }
        result
    }
}
