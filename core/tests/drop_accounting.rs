//! Dropping a tree releases every allocation it made, exactly once.
//!
//! Kept in its own test binary: the counting allocator is process-wide.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

use emlogo::{Node, read_str};

struct CountingAlloc;

static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
static FREED: AtomicUsize = AtomicUsize::new(0);

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        ALLOCATED.fetch_add(1, Ordering::SeqCst);
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        FREED.fetch_add(1, Ordering::SeqCst);
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn live() -> isize {
    ALLOCATED.load(Ordering::SeqCst) as isize - FREED.load(Ordering::SeqCst) as isize
}

#[test]
fn test_dropping_tree_releases_everything() {
    let input = "to spiral [repeat 10 [fd 5.5 rt 90 [deeper [still deeper]]]] end";

    // Warm up once so lazily registered statics are not counted.
    drop(read_str(input).expect("read failed"));
    let before = live();

    let parsed = read_str(input).expect("read failed");
    let tree: Node = parsed.tree;
    drop(parsed.warnings);
    assert!(live() > before);
    assert_eq!(tree.atom_count(), 12);

    drop(tree);
    assert_eq!(live(), before);
}
