use criterion::{criterion_group, criterion_main, Criterion};
use rb_collections::arena::{Handle, TypedArena};

const CHUNK_SIZE: usize = 1024;
const NUM_OF_ALLOCATIONS: usize = 100;

struct Link {
    val: i32,
    next: Option<Handle>,
}

fn bench_arena(c: &mut Criterion) {
    c.bench_function("bench arena", |b| {
        b.iter(|| {
            let mut arena = TypedArena::new(CHUNK_SIZE);
            let mut curr = arena.allocate(Link { val: 0, next: None });
            for val in 0..NUM_OF_ALLOCATIONS {
                curr = arena.allocate(Link {
                    val: val as i32,
                    next: Some(curr),
                });
            }
            let mut sum = 0;
            let mut next = Some(curr);
            while let Some(handle) = next {
                sum += arena[handle].val;
                next = arena[handle].next;
            }
            sum
        })
    });
}

fn bench_arena_reuse(c: &mut Criterion) {
    c.bench_function("bench arena reuse", |b| {
        let mut arena = TypedArena::new(CHUNK_SIZE);
        b.iter(|| {
            let handles = (0..NUM_OF_ALLOCATIONS)
                .map(|val| arena.allocate(Link { val: val as i32, next: None }))
                .collect::<Vec<Handle>>();
            for handle in handles {
                arena.free(handle);
            }
        })
    });
}

fn bench_box(c: &mut Criterion) {
    c.bench_function("bench box", |b| {
        b.iter(|| {
            struct BoxLink {
                val: i32,
                next: Option<Box<BoxLink>>,
            }

            let mut curr = Box::new(BoxLink { val: 0, next: None });
            for val in 0..NUM_OF_ALLOCATIONS {
                curr = Box::new(BoxLink {
                    val: val as i32,
                    next: Some(curr),
                });
            }
            let mut sum = 0;
            let mut next = Some(&curr);
            while let Some(link) = next {
                sum += link.val;
                next = link.next.as_ref();
            }
            sum
        })
    });
}

criterion_group!(benches, bench_arena, bench_arena_reuse, bench_box);
criterion_main!(benches);
