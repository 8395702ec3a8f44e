use criterion::{criterion_group, criterion_main, Criterion};
use ordered_rbtree::arena::{Handle, TypedArena};

const CHUNK_SIZE: usize = 1024;
const NUM_OF_ALLOCATIONS: usize = 1000;

struct ArenaNode {
    value: usize,
    left: Option<Handle>,
    right: Option<Handle>,
    parent: Option<Handle>,
}

struct BoxNode {
    value: usize,
    left: Option<Box<BoxNode>>,
    right: Option<Box<BoxNode>>,
}

fn bench_arena(c: &mut Criterion) {
    c.bench_function("bench arena nodes", |b| {
        b.iter(|| {
            let mut arena = TypedArena::new(CHUNK_SIZE);
            let mut curr = arena.allocate(ArenaNode {
                value: 0,
                left: None,
                right: None,
                parent: None,
            });
            for value in 1..NUM_OF_ALLOCATIONS {
                let next = arena.allocate(ArenaNode {
                    value,
                    left: Some(curr),
                    right: None,
                    parent: None,
                });
                arena[curr].parent = Some(next);
                curr = next;
            }
            arena[curr].value + arena[curr].right.map_or(0, |_| 1)
        })
    });
}

fn bench_box(c: &mut Criterion) {
    c.bench_function("bench box nodes", |b| {
        b.iter(|| {
            let mut curr = Box::new(BoxNode {
                value: 0,
                left: None,
                right: None,
            });
            for value in 1..NUM_OF_ALLOCATIONS {
                curr = Box::new(BoxNode {
                    value,
                    left: Some(curr),
                    right: None,
                });
            }
            curr.value + curr.right.as_ref().map_or(0, |_| 1)
        })
    });
}

criterion_group!(benches, bench_arena, bench_box);
criterion_main!(benches);
