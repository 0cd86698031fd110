//
// Copyright (c) 2025 Nathan Fiedler
//
use array_containers::{MaxHeap, Queue, sort};
use std::collections::{BinaryHeap, VecDeque};
use std::time::Instant;

fn benchmark_queue(size: usize) {
    let start = Instant::now();
    let mut coll: Queue<usize> = Queue::new();
    for value in 0..size {
        coll.enqueue(value).unwrap();
    }
    let duration = start.elapsed();
    println!("queue enqueue: {:?}", duration);

    // test sequenced access for entire collection
    let start = Instant::now();
    for (index, value) in coll.iter().enumerate() {
        assert_eq!(*value, index);
    }
    let duration = start.elapsed();
    println!("queue ordered: {:?}", duration);

    // interleave dequeue and enqueue so the ring wraps repeatedly
    let start = Instant::now();
    for value in 0..size {
        let front = coll.dequeue().unwrap();
        coll.enqueue(front + value).unwrap();
    }
    let duration = start.elapsed();
    println!("queue {size} dequeue/enqueue: {:?}", duration);

    let unused = coll.capacity() - coll.len();
    println!("unused capacity: {unused}");
    let start = Instant::now();
    while !coll.is_empty() {
        coll.dequeue().unwrap();
    }
    let duration = start.elapsed();
    println!("queue dequeue-all: {:?}", duration);
    println!("queue capacity: {}", coll.capacity());
}

fn benchmark_vecdeque(size: usize) {
    let start = Instant::now();
    let mut coll: VecDeque<usize> = VecDeque::new();
    for value in 0..size {
        coll.push_back(value);
    }
    let duration = start.elapsed();
    println!("vecdeque push: {:?}", duration);

    let start = Instant::now();
    for value in 0..size {
        let front = coll.pop_front().unwrap();
        coll.push_back(front + value);
    }
    let duration = start.elapsed();
    println!("vecdeque {size} pop/push: {:?}", duration);
}

fn benchmark_heap(size: usize) {
    let start = Instant::now();
    let mut coll: MaxHeap<u64> = MaxHeap::new();
    for _ in 0..size {
        coll.insert(rand::random()).unwrap();
    }
    let duration = start.elapsed();
    println!("heap insert: {:?}", duration);
    println!("heap capacity: {}", coll.capacity());

    let start = Instant::now();
    let mut previous = u64::MAX;
    while let Ok(value) = coll.delete() {
        assert!(value <= previous);
        previous = value;
    }
    let duration = start.elapsed();
    println!("heap delete-all: {:?}", duration);
}

fn benchmark_binary_heap(size: usize) {
    let start = Instant::now();
    let mut coll: BinaryHeap<u64> = BinaryHeap::new();
    for _ in 0..size {
        coll.push(rand::random());
    }
    let duration = start.elapsed();
    println!("binaryheap push: {:?}", duration);

    let start = Instant::now();
    while coll.pop().is_some() {}
    let duration = start.elapsed();
    println!("binaryheap pop-all: {:?}", duration);
}

fn benchmark_sort(size: usize) {
    let mut data: Vec<u64> = (0..=size).map(|_| rand::random()).collect();
    let mut expected = data.clone();
    let start = Instant::now();
    sort(&mut data);
    let duration = start.elapsed();
    println!("heap sort: {:?}", duration);

    let start = Instant::now();
    expected[1..].sort_unstable();
    let duration = start.elapsed();
    println!("slice sort_unstable: {:?}", duration);
    assert_eq!(data, expected);
}

fn main() {
    let size = 10_000_000;
    println!("creating Queue of {size} elements...");
    benchmark_queue(size);
    println!("creating VecDeque of {size} elements...");
    benchmark_vecdeque(size);
    let size = 5_000_000;
    println!("creating MaxHeap of {size} elements...");
    benchmark_heap(size);
    println!("creating BinaryHeap of {size} elements...");
    benchmark_binary_heap(size);
    println!("sorting {size} elements...");
    benchmark_sort(size);
}
