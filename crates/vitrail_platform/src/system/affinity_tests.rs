//! Tests for the context thread-affinity protocol
//!
//! These exercise the single-owner invariant with real OS threads: claims
//! against a context owned by another thread must fail fast, rebinding must
//! be a no-op, and every thread must only ever observe its own binding while
//! the main thread keeps appending contexts.

#[cfg(test)]
mod tests {
    use crate::graphics::recording::CountingObserver;
    use crate::platform::{BackendCall, HeadlessBackend, PlatformError};
    use crate::System;
    use std::sync::{mpsc, Arc, Barrier};
    use std::thread;

    fn make_current_count(backend: &HeadlessBackend) -> usize {
        backend
            .calls()
            .iter()
            .filter(|call| matches!(call, BackendCall::MakeCurrent(_)))
            .count()
    }

    #[test]
    fn a_context_bound_elsewhere_cannot_be_claimed() {
        let mut system = System::new(Arc::new(HeadlessBackend::new()));
        let context = system.create_context().expect("context creation");
        let affinity = system.affinity();

        let (bound_tx, bound_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let worker_affinity = affinity.clone();
        let worker_context = Arc::clone(&context);
        let worker = thread::spawn(move || {
            worker_affinity
                .make_current(Some(&worker_context))
                .expect("worker bind");
            bound_tx.send(()).expect("signal bound");
            release_rx.recv().expect("wait for main");
            worker_affinity.make_current(None).expect("worker release");
        });

        bound_rx.recv().expect("worker bound");
        let owner = context.bound_thread().expect("context bound");

        let result = affinity.make_current(Some(&context));
        assert!(matches!(
            result,
            Err(PlatformError::AlreadyBound { .. })
        ));
        // the failed claim must not have disturbed the worker's binding
        assert_eq!(context.bound_thread(), Some(owner));
        assert!(affinity.current_context().is_none());

        release_tx.send(()).expect("release worker");
        worker.join().expect("worker thread");
        assert_eq!(context.bound_thread(), None);
    }

    #[test]
    fn rebinding_the_current_context_is_a_noop() {
        let backend = Arc::new(HeadlessBackend::new());
        let mut system = System::new(backend.clone());
        let context = system.create_context().expect("context creation");

        system.make_current(Some(&context)).expect("first bind");
        let calls_after_first = make_current_count(&backend);

        system.make_current(Some(&context)).expect("rebind");
        assert_eq!(make_current_count(&backend), calls_after_first);
        assert!(system
            .current_context()
            .is_some_and(|current| Arc::ptr_eq(&current, &context)));
    }

    #[test]
    fn binding_replaces_the_calling_threads_previous_binding() {
        let mut system = System::new(Arc::new(HeadlessBackend::new()));
        let first = system.create_context().expect("first context");
        let second = system.create_context().expect("second context");

        system.make_current(Some(&first)).expect("bind first");
        system.make_current(Some(&second)).expect("bind second");

        assert!(system
            .current_context()
            .is_some_and(|current| Arc::ptr_eq(&current, &second)));
        assert_eq!(first.bound_thread(), None);
    }

    #[test]
    fn clearing_the_binding_releases_the_context() {
        let backend = Arc::new(HeadlessBackend::new());
        let mut system = System::new(backend.clone());
        let context = system.create_context().expect("context creation");

        system.make_current(Some(&context)).expect("bind");
        system.make_current(None).expect("clear");

        assert!(system.current_context().is_none());
        assert_eq!(context.bound_thread(), None);
        assert!(backend.calls().contains(&BackendCall::MakeCurrent(None)));
    }

    #[test]
    fn a_disposed_context_can_never_be_bound_again() {
        let mut system = System::new(Arc::new(HeadlessBackend::new()));
        let context = system.create_context().expect("context creation");

        // dispose while bound to this thread: the destroy releases first
        system.make_current(Some(&context)).expect("bind");
        system.destroy_context(&context).expect("destroy");

        let result = system.make_current(Some(&context));
        assert!(matches!(
            result,
            Err(PlatformError::ObjectDisposed("context"))
        ));
        assert_eq!(context.bound_thread(), None);
    }

    #[test]
    fn each_thread_only_observes_its_own_binding() {
        const WORKERS: usize = 4;

        let mut system = System::new(Arc::new(HeadlessBackend::new()));
        let contexts: Vec<_> = (0..WORKERS)
            .map(|_| system.create_context().expect("context creation"))
            .collect();
        let affinity = system.affinity();

        let all_bound = Arc::new(Barrier::new(WORKERS + 1));
        let all_checked = Arc::new(Barrier::new(WORKERS + 1));

        let workers: Vec<_> = contexts
            .iter()
            .map(|context| {
                let affinity = affinity.clone();
                let context = Arc::clone(context);
                let all_bound = Arc::clone(&all_bound);
                let all_checked = Arc::clone(&all_checked);
                thread::spawn(move || {
                    affinity.make_current(Some(&context)).expect("worker bind");
                    all_bound.wait();
                    // every worker holds a binding now; the scan must return
                    // exactly this worker's context
                    let current = affinity.current_context().expect("current context");
                    assert!(Arc::ptr_eq(&current, &context));
                    all_checked.wait();
                    affinity.make_current(None).expect("worker release");
                })
            })
            .collect();

        all_bound.wait();
        // grow the collection while the workers scan it
        for _ in 0..8 {
            system.create_context().expect("context creation");
        }
        assert!(system.current_context().is_none());
        all_checked.wait();

        for worker in workers {
            worker.join().expect("worker thread");
        }
        for context in &contexts {
            assert_eq!(context.bound_thread(), None);
        }
    }

    #[test]
    fn observer_hears_about_binds_but_not_rebinds_or_clears() {
        let mut system = System::new(Arc::new(HeadlessBackend::new()));
        let observer = Arc::new(CountingObserver::new());
        system.set_context_observer(observer.clone());

        let context = system.create_context().expect("context creation");
        system.make_current(Some(&context)).expect("bind");
        assert_eq!(observer.count(), 1);

        system.make_current(Some(&context)).expect("rebind");
        assert_eq!(observer.count(), 1);

        system.make_current(None).expect("clear");
        assert_eq!(observer.count(), 1);

        system.make_current(Some(&context)).expect("second bind");
        assert_eq!(observer.count(), 2);
    }
}
