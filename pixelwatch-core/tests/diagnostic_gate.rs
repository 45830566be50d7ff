mod common;

use std::cell::Cell;

use common::{RecordingSink, SimClock};
use embassy_futures::block_on;
use embassy_futures::join::{join, join3};
use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal_async::delay::DelayNs;
use pixelwatch_core::config::DiagnosticConfig;
use pixelwatch_core::diag::DiagnosticGate;

type Gate = DiagnosticGate<NoopRawMutex, RecordingSink>;

fn no_drain() -> DiagnosticConfig {
    DiagnosticConfig {
        drain_delay_ms: 0,
        ..DiagnosticConfig::default()
    }
}

/// Holder takes the gate at t=0 and keeps it for `hold_ms`; a second
/// caller then tries with the default one-second timeout.
/// Returns (acquired, time the attempt resolved).
fn contend(hold_ms: u32) -> (bool, u64) {
    let clock = SimClock::new();
    let gate: Gate = DiagnosticGate::new(RecordingSink::default(), no_drain());

    let holder = async {
        let mut delay = clock.delay();
        let guard = gate.acquire(&mut delay).await;
        assert!(guard.is_some());
        delay.delay_ms(hold_ms).await;
        drop(guard);
    };
    let contender = async {
        yield_now().await;
        let mut delay = clock.delay();
        let acquired = gate.acquire(&mut delay).await.is_some();
        (acquired, clock.now())
    };

    let ((), result, ()) = block_on(join3(holder, contender, clock.run_for(3000)));
    result
}

#[test]
fn test_waiter_gets_gate_when_holder_releases() {
    let (acquired, at) = contend(500);
    assert!(acquired);
    assert!((500..=501).contains(&at), "acquired at {at}");
}

#[test]
fn test_waiter_times_out_when_holder_keeps_gate() {
    let (acquired, at) = contend(1500);
    assert!(!acquired);
    assert!(at >= 1000, "gave up at {at}");
    assert!(at < 1500, "gave up at {at}");
}

#[test]
fn test_release_then_acquire_succeeds() {
    let clock = SimClock::new();
    let sink = RecordingSink::default();
    let gate: Gate = DiagnosticGate::new(sink.clone(), DiagnosticConfig::default());

    let ((), ()) = block_on(join(
        async {
            let mut delay = clock.delay();
            let guard = gate.acquire(&mut delay).await;
            let Some(mut out) = guard else {
                panic!("first acquire failed");
            };
            out.line(format_args!("first"));
            out.release(&mut delay).await;
            // Drain delay was spent while holding
            assert!(clock.now() >= 50);

            let mut out = gate.acquire(&mut delay).await.expect("second acquire");
            out.line(format_args!("second"));
            out.release(&mut delay).await;
        },
        clock.run_for(500),
    ));

    assert_eq!(sink.lines(), vec!["first".to_string(), "second".to_string()]);
}

#[test]
fn test_never_two_holders() {
    let clock = SimClock::new();
    let gate: Gate = DiagnosticGate::new(RecordingSink::default(), DiagnosticConfig::default());
    let holders = Cell::new(0u32);
    let served = Cell::new(0u32);

    let worker = |id: u32| {
        let clock = clock.clone();
        let gate = &gate;
        let holders = &holders;
        let served = &served;
        async move {
            let mut delay = clock.delay();
            for round in 0..3 {
                if gate
                    .emit(&mut delay, |out| {
                        holders.set(holders.get() + 1);
                        assert_eq!(holders.get(), 1);
                        out.line(format_args!("worker {} round {}", id, round));
                        holders.set(holders.get() - 1);
                    })
                    .await
                {
                    served.set(served.get() + 1);
                }
                delay.delay_ms(id + 1).await;
            }
        }
    };

    block_on(join(
        join3(worker(0), worker(1), worker(2)),
        clock.run_for(5000),
    ));
    // 50 ms drain per block, so nobody should hit the 1 s timeout
    assert_eq!(served.get(), 9);
}

#[test]
fn test_guard_held_across_await_excludes_others() {
    let clock = SimClock::new();
    let gate: Gate = DiagnosticGate::new(RecordingSink::default(), DiagnosticConfig::default());
    let inside = Cell::new(false);

    let task = |hold: u32| {
        let clock = clock.clone();
        let gate = &gate;
        let inside = &inside;
        async move {
            let mut delay = clock.delay();
            if let Some(out) = gate.acquire(&mut delay).await {
                assert!(!inside.get());
                inside.set(true);
                delay.delay_ms(hold).await;
                inside.set(false);
                out.release(&mut delay).await;
            }
        }
    };

    block_on(join(join(task(200), task(300)), clock.run_for(2000)));
}

#[test]
fn test_disabled_gate_skips_immediately() {
    let clock = SimClock::new();
    let sink = RecordingSink::default();
    let gate: Gate = DiagnosticGate::new(sink.clone(), DiagnosticConfig::disabled());
    let mut delay = clock.delay();

    assert!(!gate.is_enabled());
    assert!(block_on(gate.acquire(&mut delay)).is_none());
    let ran = block_on(gate.emit(&mut delay, |out| out.line(format_args!("hidden"))));
    assert!(!ran);
    block_on(gate.paced_delay(&mut delay, 500));
    assert_eq!(clock.now(), 0);
    assert!(sink.lines().is_empty());
}
