use super::*;
use crate::error_set::{ErrorEntry, ErrorKindSet};
use throwdoc_model::DeclId;

#[test]
fn returned_values_are_cleared_and_reused() {
    let pool: BuilderPool<ErrorKindSet> = BuilderPool::new(2);
    {
        let mut set = pool.take();
        set.add(ErrorEntry::unqualified(DeclId(7)));
    }
    assert_eq!(pool.available(), 1);

    let set = pool.take();
    assert!(set.is_empty());
    assert!(set.capacity() > 0, "pooled value keeps its allocation");
    assert_eq!(pool.available(), 0);
}

#[test]
fn empty_pool_falls_back_to_fresh_values() {
    let pool: BuilderPool<ErrorKindSet> = BuilderPool::new(0);
    let mut set = pool.take();
    set.add(ErrorEntry::unqualified(DeclId(1)));
    drop(set);
    assert_eq!(pool.available(), 0);
}

#[test]
fn oversized_values_are_not_pooled() {
    let pool: BuilderPool<ErrorKindSet> = BuilderPool::new(1);
    {
        let mut set = pool.take();
        for i in 0..=throwdoc_common::limits::POOLED_SET_MAX_CAPACITY as u32 {
            set.add(ErrorEntry::unqualified(DeclId(i)));
        }
    }
    assert_eq!(pool.available(), 0);
}

#[test]
fn into_inner_keeps_value_out_of_pool() {
    let pool: BuilderPool<ErrorKindSet> = BuilderPool::new(1);
    let mut set = pool.take();
    set.add(ErrorEntry::unqualified(DeclId(3)));
    let owned = set.into_inner();

    assert_eq!(owned.len(), 1);
    assert_eq!(pool.available(), 0);
}

#[test]
fn concurrent_loans_never_share_a_value() {
    let pool: BuilderPool<ErrorKindSet> = BuilderPool::new(4);
    std::thread::scope(|scope| {
        for worker in 0..8u32 {
            let pool = &pool;
            scope.spawn(move || {
                for round in 0..100u32 {
                    let mut set = pool.take();
                    assert!(set.is_empty());
                    set.add(ErrorEntry::unqualified(DeclId(worker * 1000 + round)));
                    assert_eq!(set.len(), 1);
                }
            });
        }
    });
    assert!(pool.available() <= 4);
}
