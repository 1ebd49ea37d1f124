//! Stress tests for nexq-logging session context
//!
//! Checks that SessionContextGuard stays isolated per thread and restores
//! correctly under heavy nesting and switching.

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

use nexq_logging::context::SessionContextGuard;

/// Deeply nested guards unwind back to the outer context
#[test]
fn test_deep_guard_nesting() {
    fn nest(depth: usize) {
        if depth == 0 {
            return;
        }
        let user = format!("user-{depth}");
        let _guard = SessionContextGuard::new(user.clone(), "Retailer");
        nest(depth - 1);
        assert_eq!(SessionContextGuard::current_user(), Some(user));
    }

    let start = Instant::now();
    nest(500);
    assert!(SessionContextGuard::current().is_none());
    println!("Nested 500 guards in {:?}", start.elapsed());
}

/// Concurrent guard creation never leaks context between threads
#[test]
fn test_concurrent_session_contexts() {
    const NUM_THREADS: usize = 32;
    const ITERATIONS: usize = 200;

    let barrier = Arc::new(Barrier::new(NUM_THREADS));
    let mut handles = vec![];

    for thread_id in 0..NUM_THREADS {
        let barrier = Arc::clone(&barrier);

        handles.push(thread::spawn(move || {
            let user = format!("Company {thread_id}");
            barrier.wait();

            for i in 0..ITERATIONS {
                let role = if i % 2 == 0 { "Manufacturer" } else { "Wholesaler" };
                let _guard = SessionContextGuard::new(user.clone(), role);

                let ctx = SessionContextGuard::current().unwrap();
                assert_eq!(ctx.user, user);
                assert_eq!(ctx.role, role);
            }

            assert!(SessionContextGuard::current().is_none());
        }));
    }

    for handle in handles {
        handle.join().expect("thread panicked");
    }
}

/// Each guard gets its own instance id unless one is supplied
#[test]
fn test_instance_ids_are_unique() {
    let first = {
        let _guard = SessionContextGuard::new("ABC Electronics", "Manufacturer");
        SessionContextGuard::current_instance_id().unwrap()
    };
    let second = {
        let _guard = SessionContextGuard::new("ABC Electronics", "Manufacturer");
        SessionContextGuard::current_instance_id().unwrap()
    };
    assert_ne!(first, second);
}
